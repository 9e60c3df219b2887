use page_builder_backend::{
    blocks::decode_blocks, client::PagesClient, editor::EditorSession, media::is_data_uri,
};
use std::{env, process};

const USAGE: &str = "Usage: cargo run --bin publish-page <BLOCKS.json> \
[--bg <IMAGE|URL>] [--first <NAME>] [--last <NAME>] [--orientation <TEXT>]";

struct Args {
    blocks_path: String,
    background: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    orientation: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = env::args().skip(1);
    let mut blocks_path = None;
    let mut parsed = Args {
        blocks_path: String::new(),
        background: None,
        first_name: None,
        last_name: None,
        orientation: None,
    };

    while let Some(arg) = args.next() {
        if !arg.starts_with("--") {
            blocks_path = Some(arg);
            continue;
        }
        let slot = match arg.as_str() {
            "--bg" => &mut parsed.background,
            "--first" => &mut parsed.first_name,
            "--last" => &mut parsed.last_name,
            "--orientation" => &mut parsed.orientation,
            _ => return Err(format!("unknown option {arg}")),
        };
        *slot = Some(args.next().ok_or_else(|| format!("missing value for {arg}"))?);
    }

    parsed.blocks_path = blocks_path.ok_or("missing blocks file")?;
    Ok(parsed)
}

async fn publish(args: Args) -> Result<i32, Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(&args.blocks_path).await?;
    let mut session = EditorSession::with_blocks(decode_blocks(&text)?);
    session.first_name = args.first_name;
    session.last_name = args.last_name;
    session.orientation = args.orientation;

    match args.background {
        Some(bg) if bg.starts_with("http://") || bg.starts_with("https://") || is_data_uri(&bg) => {
            session.set_background_image(Some(bg))
        }
        Some(path) => session.set_background_image_file(&path).await?,
        None => {}
    }

    let client = PagesClient::from_env();
    println!("Publishing \"{}\" to {}", session.display_name(), client.base_url());
    Ok(session.publish(&client).await?)
}

#[tokio::main]
async fn main() {
    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("{e}\n{USAGE}");
        process::exit(1);
    });

    match publish(args).await {
        Ok(id) => {
            println!("\nPage id : {}", id);
            println!("View    : /view/{}\n", id);
        }
        Err(e) => {
            eprintln!("Error publishing page: {}", e);
            process::exit(1);
        }
    }
}
