use reqwest::{header, Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::dto::response::ListResponse,
};

const REQUEST_ID_HEADER: &str = "X-Request-Id";
const MAX_LIST_PAGES: usize = 50;

/// Thin JSON client for the learning backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl ApiClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL; paths keep their trailing slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.http.get(self.url(path)).query(query);
        self.send(request, "GET", path).await
    }

    /// Collects every page of a list endpoint by following `next` links.
    pub async fn get_list<T>(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut page: ListResponse<T> = self.get_json(path, query).await?;
        let expected = page.total_count();
        let mut items = Vec::new();
        let mut fetched = 1;

        loop {
            let next = page.next_page().map(|next| self.resolve(next));
            items.extend(page.into_items());

            let Some(next) = next else {
                break;
            };
            if fetched >= MAX_LIST_PAGES {
                log::warn!("GET {} stopped after {} pages", path, fetched);
                break;
            }
            page = self.send(self.http.get(&next), "GET", &next).await?;
            fetched += 1;
        }

        if let Some(expected) = expected {
            if (items.len() as u64) < expected {
                log::warn!(
                    "GET {} reported {} items but returned {}",
                    path,
                    expected,
                    items.len()
                );
            }
        }
        Ok(items)
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.send(request, "POST", path).await
    }

    pub async fn health_check(&self) -> AppResult<()> {
        let request = self.authorize(self.http.get(self.url("health/")));
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::from_status(response.status(), ""))
        }
    }

    /// `next` links are usually absolute; relative ones hang off the base URL.
    fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            self.url(link)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send<T>(&self, request: RequestBuilder, method: &str, path: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let request_id = Uuid::new_v4().to_string();
        log::debug!("{} {} [{}]", method, path, request_id);

        let response = self
            .authorize(request)
            .header(REQUEST_ID_HEADER, &request_id)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                log::warn!("{} {} [{}] failed: {}", method, path, request_id, e);
                AppError::from(e)
            })?;

        Self::decode(response, method, path, &request_id).await
    }

    async fn decode<T>(response: Response, method: &str, path: &str, request_id: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "{} {} [{}] returned {}: {}",
                method,
                path,
                request_id,
                status.as_u16(),
                body
            );
            return Err(AppError::from_status(status, &body));
        }

        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes)?;
        Ok(value)
    }
}
