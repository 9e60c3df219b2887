//! Page Builder Backend - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    if let Err(e) = page_builder_backend::run().await {
        eprintln!("page-builder-backend: {e}");
        std::process::exit(1);
    }
}
