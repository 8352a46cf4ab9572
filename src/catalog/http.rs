use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::api::{validate_rating, AdminApi, CatalogApi};
use super::error::{CatalogError, CatalogResult};
use super::item::CatalogItem;
use super::query::{CatalogPage, CatalogQuery};
use crate::config::ApiConfig;

#[derive(Debug, Deserialize)]
struct RecommendUserResponse {
    #[serde(default)]
    results: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendSimilarResponse {
    #[serde(default)]
    recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RatingRequest<'a> {
    show_id: &'a str,
    rating: u8,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// reqwest-backed client for the movies and recommendation services.
#[derive(Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
    recommender_url: String,
    credential_cookie: Option<String>,
}

impl HttpCatalogClient {
    pub fn new(config: &ApiConfig) -> CatalogResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            recommender_url: config.recommender_url.trim_end_matches('/').to_string(),
            credential_cookie: config.credential_cookie.clone(),
        })
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        debug!(method = %method, url = %url, "catalog request");
        let builder = self.http.request(method, url);
        match self.credential_cookie {
            Some(ref cookie) => builder.header(header::COOKIE, cookie.as_str()),
            None => builder,
        }
    }

    fn movies_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn title_url(&self, action: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, action, urlencoding::encode(id))
    }

    async fn send(&self, builder: RequestBuilder) -> CatalogResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let message = error_message(response).await;
        warn!(status = status.as_u16(), url = %url, "catalog request failed");

        Err(match status {
            StatusCode::NOT_FOUND => CatalogError::NotFound(message.unwrap_or(url)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                CatalogError::Validation(message.unwrap_or_else(|| status.to_string()))
            }
            _ => CatalogError::Network(format!("HTTP {} from {}", status.as_u16(), url)),
        })
    }
}

/// Pull a human-readable message out of an error body, if the backend sent one.
async fn error_message(response: Response) -> Option<String> {
    let text = response.text().await.ok()?;
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(body) => body.message,
        Err(_) => Some(text.to_string()),
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn query_catalog(&self, query: &CatalogQuery) -> CatalogResult<CatalogPage> {
        let builder = self
            .request(Method::GET, self.movies_url("GetMovies"))
            .query(&query.query_pairs());
        let page = self.send(builder).await?.json::<CatalogPage>().await?;
        Ok(page)
    }

    async fn resolve_by_id(&self, id: &str) -> CatalogResult<CatalogItem> {
        let builder = self.request(Method::GET, self.title_url("GetMovie", id));
        match self.send(builder).await {
            Ok(response) => Ok(response.json::<CatalogItem>().await?),
            Err(CatalogError::NotFound(_)) => Err(CatalogError::NotFound(id.to_string())),
            Err(e) => Err(e),
        }
    }

    async fn fetch_recommendation_ids(&self, user_id: &str, max_count: u32) -> CatalogResult<Vec<String>> {
        let url = format!("{}/recommend_user", self.recommender_url);
        let builder = self
            .request(Method::GET, url)
            .query(&[("user_id", user_id.to_string()), ("num", max_count.to_string())]);
        let body = self.send(builder).await?.json::<RecommendUserResponse>().await?;
        Ok(body.results)
    }

    async fn fetch_similar_titles(&self, show_id: &str, num: u32) -> CatalogResult<Vec<String>> {
        let url = format!("{}/recommend", self.recommender_url);
        let builder = self
            .request(Method::GET, url)
            .query(&[("show_id", show_id.to_string()), ("num", num.to_string())]);
        let body = self.send(builder).await?.json::<RecommendSimilarResponse>().await?;
        Ok(body.recommendations)
    }

    async fn submit_rating(&self, show_id: &str, user_id: &str, rating: u8) -> CatalogResult<()> {
        validate_rating(rating)?;
        let url = format!("{}/ratings", self.recommender_url);
        let builder = self.request(Method::POST, url).json(&RatingRequest {
            show_id,
            rating,
            user_id,
        });
        self.send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl AdminApi for HttpCatalogClient {
    async fn list_categories(&self) -> CatalogResult<Vec<String>> {
        let builder = self.request(Method::GET, self.movies_url("GetCategories"));
        Ok(self.send(builder).await?.json::<Vec<String>>().await?)
    }

    async fn add_title(&self, item: &CatalogItem) -> CatalogResult<CatalogItem> {
        let builder = self.request(Method::POST, self.movies_url("AddMovie")).json(item);
        Ok(self.send(builder).await?.json::<CatalogItem>().await?)
    }

    async fn update_title(&self, id: &str, item: &CatalogItem) -> CatalogResult<CatalogItem> {
        let builder = self
            .request(Method::PUT, self.title_url("UpdateMovie", id))
            .json(item);
        Ok(self.send(builder).await?.json::<CatalogItem>().await?)
    }

    async fn delete_title(&self, id: &str) -> CatalogResult<()> {
        let builder = self.request(Method::DELETE, self.title_url("DeleteMovie", id));
        self.send(builder).await?;
        Ok(())
    }
}
