/*!
 * Pages Client
 * HTTP client used by the builder and the CLI to publish and fetch pages
 */
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use crate::editor::{EditorError, EditorSession, PublishGuard};
use crate::routes::{
    pages::{CreatePageRequest, CreatePageResponse, PageResponse, PageSummary},
    ErrorResponse,
};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("a publish is already in progress")]
    PublishInFlight,
    #[error(transparent)]
    Draft(#[from] EditorError),
}

/// Outcome of loading remote data for a view. Failures stop loading and are
/// shown as-is; nothing retries.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loaded(T),
    NotFound,
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(self) -> Option<T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PagesClient {
    http: Client,
    base_url: String,
    publish_guard: PublishGuard,
}

impl PagesClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            publish_guard: PublishGuard::new(),
        }
    }

    /// `BUILDER_API_URL`, else the local server.
    pub fn from_env() -> Self {
        Self::new(std::env::var("BUILDER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared by clones of this client.
    pub fn publish_guard(&self) -> &PublishGuard {
        &self.publish_guard
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn status_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(body) => ClientError::Status {
                status: status.as_u16(),
                message: body.message.unwrap_or_else(|| body.error.clone()),
                code: Some(body.error),
            },
            Err(_) => ClientError::Status {
                status: status.as_u16(),
                code: None,
                message: text,
            },
        }
    }

    /// POST /api/page. A second call while one is pending fails immediately.
    pub async fn publish(&self, draft: &CreatePageRequest) -> Result<i32, ClientError> {
        let _ticket = self
            .publish_guard
            .try_begin()
            .ok_or(ClientError::PublishInFlight)?;

        let response = self
            .http
            .post(self.url("/api/page"))
            .json(draft)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::status_error(response).await;
            tracing::warn!(error = %err, "publish rejected");
            return Err(err);
        }

        let created: CreatePageResponse = response.json().await?;
        tracing::info!(page_id = created.id, "page published");
        Ok(created.id)
    }

    /// GET /api/pages
    pub async fn list_pages(&self) -> Result<Vec<PageSummary>, ClientError> {
        let response = self.http.get(self.url("/api/pages")).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// GET /api/page/{id}; `None` when the server has no such page.
    pub async fn get_page(&self, id: i32) -> Result<Option<PageResponse>, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/page/{id}")))
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            _ => Err(Self::status_error(response).await),
        }
    }

    pub async fn load_gallery(&self) -> LoadState<Vec<PageSummary>> {
        match self.list_pages().await {
            Ok(pages) => LoadState::Loaded(pages),
            Err(e) => {
                tracing::error!(error = %e, "failed to load gallery");
                LoadState::Failed(e.to_string())
            }
        }
    }

    pub async fn load_page(&self, id: i32) -> LoadState<PageResponse> {
        match self.get_page(id).await {
            Ok(Some(page)) => LoadState::Loaded(page),
            Ok(None) => LoadState::NotFound,
            Err(ClientError::Status { status: 400, .. }) => LoadState::NotFound,
            Err(e) => {
                tracing::error!(page_id = id, error = %e, "failed to load page");
                LoadState::Failed(e.to_string())
            }
        }
    }
}

impl EditorSession {
    /// Publish the current state through `client`.
    pub async fn publish(&self, client: &PagesClient) -> Result<i32, ClientError> {
        let draft = self.draft()?;
        client.publish(&draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::config::ServerConfig;
    use crate::db::repository::MemoryPageRepository;
    use crate::routes::AppState;
    use std::sync::Arc;

    /// Serve the full app on an ephemeral port.
    async fn spawn_server() -> String {
        let app = crate::create_app(
            AppState::new(Arc::new(MemoryPageRepository::new())),
            &ServerConfig::default(),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_publish_then_load() {
        let client = PagesClient::new(spawn_server().await);
        let mut session = EditorSession::new();
        session.blocks.add(BlockKind::Glitch);
        session.blocks.add(BlockKind::Code);
        session.first_name = Some("Grace".to_string());
        session.last_name = Some("Hopper".to_string());

        let id = session.publish(&client).await.unwrap();
        assert!(!client.publish_guard().is_in_flight());

        let page = client.load_page(id).await.loaded().unwrap();
        assert_eq!(page.name, "Grace Hopper");
        assert_eq!(page.sections, session.blocks.as_slice());

        let gallery = client.load_gallery().await.loaded().unwrap();
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery[0].preview.preview_title.as_deref(), Some("CYBER_DEV"));
        assert_eq!(gallery[0].tag, crate::blocks::tag::Tag::Code);
    }

    #[tokio::test]
    async fn test_second_publish_while_in_flight_is_rejected() {
        let client = PagesClient::new(spawn_server().await);
        let session = EditorSession::with_blocks(vec![crate::blocks::Block::new(BlockKind::Hero)]);

        let ticket = client.publish_guard().try_begin().unwrap();
        let err = session.publish(&client).await.unwrap_err();
        assert!(matches!(err, ClientError::PublishInFlight));

        drop(ticket);
        assert!(session.publish(&client).await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_session_is_not_sent() {
        let client = PagesClient::new(spawn_server().await);
        let err = EditorSession::new().publish(&client).await.unwrap_err();
        assert!(matches!(err, ClientError::Draft(EditorError::EmptyPage)));
    }

    #[tokio::test]
    async fn test_server_rejection_carries_code() {
        let client = PagesClient::new(spawn_server().await);
        let err = client
            .publish(&CreatePageRequest {
                sections: Some(Vec::new()),
                ..CreatePageRequest::default()
            })
            .await
            .unwrap_err();
        match err {
            ClientError::Status { status, code, .. } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("sections_required"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!client.publish_guard().is_in_flight());
    }

    #[tokio::test]
    async fn test_missing_page_is_not_found() {
        let client = PagesClient::new(spawn_server().await);
        assert_eq!(client.load_page(404).await, LoadState::NotFound);
    }

    #[tokio::test]
    async fn test_unreachable_server_fails() {
        let client = PagesClient::new("http://127.0.0.1:1");
        assert!(matches!(client.load_gallery().await, LoadState::Failed(_)));
    }
}
