//! Client for the external song info service, which resolves the release
//! date, lyrics and link of a `(group, song)` pair.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, instrument};

mod date;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Info service responded with {0}")]
    Status(StatusCode),

    #[error("Invalid info service url: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetail {
    #[serde(deserialize_with = "date::deserialize")]
    pub release_date: OffsetDateTime,
    pub text: String,
    pub link: String,
}

#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetail>;
}

#[derive(Clone)]
pub struct LookupClient {
    client: reqwest::Client,
    info_url: Url,
}

impl LookupClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let info_url = Url::parse(&base)
            .and_then(|base| base.join("info"))
            .map_err(|e| LookupError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("song-library/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, info_url })
    }
}

#[async_trait]
impl MetadataLookup for LookupClient {
    #[instrument(skip(self), err)]
    async fn lookup(&self, group: &str, title: &str) -> Result<SongDetail> {
        let response = self
            .client
            .get(self.info_url.clone())
            .query(&[("group", group), ("song", title)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let detail = response.json::<SongDetail>().await?;
        debug!(release_date = %detail.release_date, "resolved song detail");
        Ok(detail)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{extract::Query, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> LookupClient {
        LookupClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn resolves_detail() {
        let router = Router::new().route(
            "/api/info",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({
                    "releaseDate": "16.07.2006",
                    "text": format!("{} by {}", params["song"], params["group"]),
                    "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw",
                }))
            }),
        );
        let base = serve(router).await;

        let detail = client(&format!("{base}/api/"))
            .lookup("Muse & Friends", "Supermassive Black Hole")
            .await
            .unwrap();

        assert_eq!(detail.release_date, datetime!(2006-07-16 0:00 UTC));
        assert_eq!(detail.text, "Supermassive Black Hole by Muse & Friends");
        assert_eq!(detail.link, "https://www.youtube.com/watch?v=Xsp3_a-PMTw");
    }

    #[tokio::test]
    async fn error_status_is_surfaced() {
        let router = Router::new().route("/info", get(|| async { AxumStatus::BAD_REQUEST }));
        let base = serve(router).await;

        let err = client(&base).lookup("Muse", "Uprising").await.unwrap_err();
        assert!(matches!(err, LookupError::Status(status) if status == StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let router = Router::new().route("/info", get(|| async { Json(json!({ "text": 1 })) }));
        let base = serve(router).await;

        let err = client(&base).lookup("Muse", "Uprising").await.unwrap_err();
        assert!(matches!(err, LookupError::Http(_)));
    }

    #[test]
    fn rejects_invalid_base_url() {
        let err = LookupClient::new("not a url", Duration::from_secs(1)).err();
        assert!(matches!(err, Some(LookupError::InvalidUrl(_))));
    }
}
