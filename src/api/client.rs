use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};

/// REST client for the student-records backend. Holds nothing but the base
/// URL and a pooled reqwest client, so one instance serves every page.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base: Url,
    client: Client,
}

/// List endpoints answer with a bare array; some deployments wrap it in
/// `{ "data": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        }
    }
}

impl HttpApi {
    /// Build a client rooted at `base_url` (for example
    /// `http://localhost:5000`). Every request gives up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .with_context(|| format!("invalid API base URL `{base_url}`"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("API base URL `{base_url}` cannot carry a path"));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL. Each segment is percent-encoded
    /// on its own, so ids containing `/` or spaces stay a single segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(&self, url: Url) -> ApiResult<Vec<T>> {
        let body: ListBody<T> = self.get_json(url).await?;
        Ok(body.into_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        debug!(%url, "GET");
        self.fetch_json(url.clone())
            .await
            .inspect_err(|err| warn!(%url, error = %err, "GET failed"))
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self.client.get(url).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Issue a request whose response body we do not need.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> ApiResult<()> {
        debug!(%method, %url, "sending request");
        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }
        match request.send().await {
            Ok(response) => check_status(response).await.map(drop),
            Err(err) => Err(ApiError::from(err)),
        }
        .inspect_err(|err| warn!(%method, %url, error = %err, "request failed"))
    }
}

/// Turn non-2xx responses into [`ApiError`], keeping whatever message the
/// backend put in the body.
async fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body);
    if status == StatusCode::NOT_FOUND {
        Err(ApiError::NotFound { message })
    } else {
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pull a human-readable message out of an error body such as
/// `{"message": "..."}` or `{"error": "..."}`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpApi {
        HttpApi::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn endpoint_joins_segments_onto_base() {
        let api = api("http://localhost:5000");
        assert_eq!(
            api.endpoint(&["api", "mahasiswa", "getMahasiswa"]).as_str(),
            "http://localhost:5000/api/mahasiswa/getMahasiswa"
        );

        let nested = self::api("http://example.test/backend/");
        assert_eq!(
            nested.endpoint(&["api", "matkul", "getMatkul"]).as_str(),
            "http://example.test/backend/api/matkul/getMatkul"
        );
    }

    #[test]
    fn endpoint_escapes_identifiers() {
        let api = api("http://localhost:5000");
        assert_eq!(
            api.endpoint(&["api", "matkul", "deleteMatkul", "IF 101/A"]).as_str(),
            "http://localhost:5000/api/matkul/deleteMatkul/IF%20101%2FA"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(HttpApi::new("not a url", Duration::from_secs(1)).is_err());
        assert!(HttpApi::new("mailto:admin@example.test", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn extracts_backend_messages() {
        assert_eq!(
            extract_message(r#"{"message":"Mahasiswa not found"}"#).as_deref(),
            Some("Mahasiswa not found")
        );
        assert_eq!(
            extract_message(r#"{"error":"Kode sudah ada"}"#).as_deref(),
            Some("Kode sudah ada")
        );
        assert_eq!(extract_message(r#"{"message":"  "}"#), None);
        assert_eq!(extract_message("<html>502</html>"), None);
    }

    #[test]
    fn list_body_accepts_both_shapes() {
        let bare: ListBody<u32> = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(bare.into_vec(), vec![1, 2]);
        let wrapped: ListBody<u32> = serde_json::from_str(r#"{"data":[3]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![3]);
    }
}
