use crate::error::ClientError;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ViewCount {
    count: u64,
}

/// HTTP client for the config store and view counter endpoints.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base: Url,
}

impl StoreClient {
    /// `base_url` is the site root, e.g. `http://localhost:3001`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(concat!("biolink/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(path)?)
    }

    pub async fn fetch_config(&self) -> Result<Value, ClientError> {
        let text = self.fetch_config_text(None).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The stored document as raw text. `cache_bust` is sent as `?t=` so
    /// intermediaries never answer a poll from cache.
    pub async fn fetch_config_text(&self, cache_bust: Option<i64>) -> Result<String, ClientError> {
        let mut url = self.endpoint("api/config")?;
        if let Some(t) = cache_bust {
            url.query_pairs_mut().append_pair("t", &t.to_string());
        }
        let resp = check(self.http.get(url).send().await?)?;
        Ok(resp.text().await?)
    }

    /// The static `config.json` shipped next to the pages.
    pub async fn fetch_static_config(&self) -> Result<Value, ClientError> {
        let url = self.endpoint("config.json")?;
        let resp = check(self.http.get(url).send().await?)?;
        Ok(resp.json().await?)
    }

    /// Replace the stored document wholesale.
    pub async fn save_config<T: Serialize + ?Sized>(
        &self,
        document: &T,
    ) -> Result<(), ClientError> {
        let url = self.endpoint("api/config")?;
        check(self.http.post(url).json(document).send().await?)?;
        Ok(())
    }

    pub async fn view_count(&self) -> Result<u64, ClientError> {
        let url = self.endpoint("api/view")?;
        let resp = check(self.http.get(url).send().await?)?;
        Ok(resp.json::<ViewCount>().await?.count)
    }

    pub async fn record_view(&self) -> Result<u64, ClientError> {
        let url = self.endpoint("api/view")?;
        let resp = check(self.http.post(url).send().await?)?;
        Ok(resp.json::<ViewCount>().await?.count)
    }
}

fn check(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ClientError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_store, spawn_store_with_static, UNREACHABLE};
    use serde_json::json;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = StoreClient::new("http://localhost:3001/site").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3001/site/");
        assert!(matches!(StoreClient::new("not a url"), Err(ClientError::Url(_))));
    }

    #[tokio::test]
    async fn save_then_fetch_round_trips() {
        let store = spawn_store().await;
        let client = StoreClient::new(&store.url).unwrap();

        let doc = json!({"profile": {"username": "a"}, "badges": [], "socialLinks": []});
        client.save_config(&doc).await.unwrap();

        assert_eq!(client.fetch_config().await.unwrap(), doc);
        let text = client.fetch_config_text(Some(1_700_000_000_000)).await.unwrap();
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), doc);
    }

    #[tokio::test]
    async fn missing_document_is_a_status_error() {
        let store = spawn_store().await;
        let client = StoreClient::new(&store.url).unwrap();

        match client.fetch_config().await {
            Err(ClientError::Status(status)) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected 404, got {other:?}"),
        }
        assert!(client.fetch_static_config().await.is_err());
    }

    #[tokio::test]
    async fn static_file_is_served_separately() {
        let doc = json!({"profile": {"username": "static"}});
        let store = spawn_store_with_static(Some(doc.clone())).await;
        let client = StoreClient::new(&store.url).unwrap();

        assert_eq!(client.fetch_static_config().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn view_counter_endpoints() {
        let store = spawn_store().await;
        let client = StoreClient::new(&store.url).unwrap();

        assert_eq!(client.view_count().await.unwrap(), 0);
        assert_eq!(client.record_view().await.unwrap(), 1);
        assert_eq!(client.record_view().await.unwrap(), 2);
        assert_eq!(client.view_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn unreachable_store_is_an_http_error() {
        let client = StoreClient::new(UNREACHABLE).unwrap();
        assert!(matches!(client.fetch_config().await, Err(ClientError::Http(_))));
    }
}
