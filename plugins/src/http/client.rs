use bytes::Bytes;
use planlog_core::api::{ApiConfig, PlanError};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{preview_body, ApiHttpError};
use super::jsonapi::MEDIA_TYPE;

const USER_AGENT: &str = concat!("planlog/", env!("CARGO_PKG_VERSION"));

async fn read_success_body(resp: reqwest::Response) -> Result<Bytes, ApiHttpError> {
    let status = resp.status();
    let url = resp.url().to_string();

    if !status.is_success() {
        let body = resp
            .text()
            .await
            .map_err(|err| ApiHttpError::from_reqwest(err, url.clone()))?;
        let preview = preview_body(&body);
        return Err(ApiHttpError::status_error(status.as_u16(), url, preview));
    }

    resp.bytes()
        .await
        .map_err(|err| ApiHttpError::from_reqwest(err, url))
}

/// Authenticated GET access to the plan API and to log objects.
#[derive(Clone)]
pub struct ApiClient {
    token: String,
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, token: String, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .user_agent(USER_AGENT)
            .build()?;
        // `Url::join` drops the last segment unless the base ends in '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)?;
        Ok(Self {
            token,
            http,
            base_url,
        })
    }

    pub fn from_config(cfg: &ApiConfig) -> anyhow::Result<Self> {
        Self::new(&cfg.base_url(), cfg.token.clone(), cfg.timeout_ms)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.token)
        }
    }

    pub fn resolve(&self, path: &str) -> Result<Url, PlanError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| {
                PlanError::transport(anyhow::anyhow!("invalid request path {path:?}: {err}"))
            })
    }

    /// GET a resolved API URL and return the body of a successful response.
    pub async fn get(&self, url: &Url) -> Result<Bytes, ApiHttpError> {
        self.send_get(url).await.map(|(_, body)| body)
    }

    /// GET a resolved API URL and decode the JSON body into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiHttpError> {
        let (status, body) = self.send_get(url).await?;
        serde_json::from_slice(&body).map_err(|err| {
            ApiHttpError::decode_error(
                status,
                url.to_string(),
                err,
                preview_body(&String::from_utf8_lossy(&body)),
            )
        })
    }

    async fn send_get(&self, url: &Url) -> Result<(u16, Bytes), ApiHttpError> {
        tracing::debug!(
            target: "planlog.http",
            stage = "http.get.in",
            url = %url
        );
        let req = self.http.get(url.clone()).header(ACCEPT, MEDIA_TYPE);
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| ApiHttpError::from_reqwest(err, url.to_string()))?;
        let status = resp.status();
        let body = read_success_body(resp).await?;
        tracing::debug!(
            target: "planlog.http",
            stage = "http.get.out",
            status = %status,
            bytes = body.len()
        );
        Ok((status.as_u16(), body))
    }

    /// GET up to `limit` bytes of a log object starting at `offset`.
    pub async fn get_log_chunk(
        &self,
        log_url: &Url,
        offset: u64,
        limit: usize,
    ) -> Result<Bytes, ApiHttpError> {
        let mut url = log_url.clone();
        url.set_query(Some(&format!("limit={}&offset={}", limit, offset)));

        let req = self.http.get(url.clone());
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| ApiHttpError::from_reqwest(err, url.to_string()))?;
        read_success_body(resp).await
    }
}
