use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::BrowseError;
use crate::model::{RecipeDetail, RecipePage};

pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";

/// Paged recipe retrieval, one method per listing endpoint.
///
/// The listing controller is written against this trait so tests can drive it
/// with a scripted source instead of a live HTTP server.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Unscoped paged listing.
    async fn list(&self, limit: u64, skip: u64) -> Result<RecipePage, BrowseError>;

    /// Paged full-text search.
    async fn search(&self, query: &str, limit: u64, skip: u64) -> Result<RecipePage, BrowseError>;

    /// Paged listing scoped to a single tag.
    async fn by_tag(&self, tag: &str, limit: u64, skip: u64) -> Result<RecipePage, BrowseError>;
}

/// HTTP client for the public recipe service.
pub struct RecipeApi {
    client: Client,
    base_url: String,
}

impl RecipeApi {
    pub fn new(timeout: Option<Duration>) -> Result<Self, BrowseError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    /// Point the client at a different host. Used by tests to target a mock server.
    pub fn with_base_url(base_url: &str, timeout: Option<Duration>) -> Result<Self, BrowseError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("recipe-browse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(RecipeApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch a single recipe by id. An unknown id is reported as
    /// `InvalidIdentifier`, not as a network failure.
    pub async fn get(&self, id: u64) -> Result<RecipeDetail, BrowseError> {
        let url = format!("{}/recipes/{}", self.base_url, id);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(BrowseError::InvalidIdentifier(id));
        }
        decode(response).await
    }

    /// List every tag known to the service.
    pub async fn tags(&self) -> Result<Vec<String>, BrowseError> {
        let url = format!("{}/recipes/tags", self.base_url);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    async fn page(
        &self,
        path: &str,
        extra: &[(&str, &str)],
        limit: u64,
        skip: u64,
    ) -> Result<RecipePage, BrowseError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} limit={} skip={}", url, limit, skip);
        let response = self
            .client
            .get(&url)
            .query(extra)
            .query(&[("limit", limit.to_string()), ("skip", skip.to_string())])
            .send()
            .await?;
        decode(response).await
    }
}

/// Check the status, then decode the body separately from the transport so
/// malformed JSON surfaces as a deserialization error rather than a network one.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BrowseError> {
    let response = response.error_for_status()?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| BrowseError::Deserialization(e.to_string()))
}

#[async_trait]
impl RecipeSource for RecipeApi {
    async fn list(&self, limit: u64, skip: u64) -> Result<RecipePage, BrowseError> {
        self.page("/recipes", &[], limit, skip).await
    }

    async fn search(&self, query: &str, limit: u64, skip: u64) -> Result<RecipePage, BrowseError> {
        self.page("/recipes/search", &[("q", query)], limit, skip).await
    }

    async fn by_tag(&self, tag: &str, limit: u64, skip: u64) -> Result<RecipePage, BrowseError> {
        let path = format!("/recipes/tag/{}", tag);
        self.page(&path, &[], limit, skip).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn page_body() -> &'static str {
        r#"{
            "recipes": [
                {"id": 1, "name": "Pasta", "image": "", "ingredients": ["pasta"]},
                {"id": 2, "name": "Soup", "image": "", "ingredients": ["water"]}
            ],
            "total": 50,
            "skip": 0,
            "limit": 2
        }"#
    }

    #[tokio::test]
    async fn list_sends_limit_and_skip() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("limit".into(), "2".into()),
                mockito::Matcher::UrlEncoded("skip".into(), "0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body())
            .create_async()
            .await;

        let api = RecipeApi::with_base_url(&server.url(), None).unwrap();
        let page = api.list(2, 0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.recipes.len(), 2);
        assert_eq!(page.total, 50);
    }

    #[tokio::test]
    async fn search_hits_search_endpoint_with_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/search")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "eggs".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body())
            .create_async()
            .await;

        let api = RecipeApi::with_base_url(&server.url(), None).unwrap();
        let page = api.search("eggs", 2, 0).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.recipes[0].name, "Pasta");
    }

    #[tokio::test]
    async fn by_tag_scopes_the_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/tag/Italian")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body())
            .create_async()
            .await;

        let api = RecipeApi::with_base_url(&server.url(), None).unwrap();
        api.by_tag("Italian", 2, 0).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unknown_id_maps_to_invalid_identifier() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/9999")
            .with_status(404)
            .with_body(r#"{"message": "Recipe with id '9999' not found"}"#)
            .create_async()
            .await;

        let api = RecipeApi::with_base_url(&server.url(), None).unwrap();
        let err = api.get(9999).await.unwrap_err();
        assert!(matches!(err, BrowseError::InvalidIdentifier(9999)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_deserialization_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let api = RecipeApi::with_base_url(&server.url(), None).unwrap();
        let err = api.list(20, 0).await.unwrap_err();
        assert!(matches!(err, BrowseError::Deserialization(_)));
    }
}
