//! API client for communicating with the prediction service

use predictor_lib::{HealthResponse, PredictRequest, PredictionResult};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors talking to the service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid API URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with an error status
    #[error("API error ({status}): {detail}")]
    Api { status: StatusCode, detail: String },

    #[error("failed to parse response: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Error body returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}

/// API client for the prediction service
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|source| ClientError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        // Endpoints are joined relative to the base, so a path prefix needs its trailing slash
        if !base_url.path().ends_with('/') {
            let prefixed = format!("{}/", base_url.path());
            base_url.set_path(&prefixed);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|source| ClientError::Request {
                url: base_url.to_string(),
                source,
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                source,
            })
    }

    /// Service banner from `GET /`
    pub async fn status(&self) -> Result<RootResponse> {
        self.get("").await
    }

    /// Health report; a 503 still carries a readable body
    pub async fn health(&self) -> Result<(StatusCode, HealthResponse)> {
        let url = self.url("healthz")?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        let status = response.status();

        if status.is_success() || status == StatusCode::SERVICE_UNAVAILABLE {
            let health = response.json().await.map_err(ClientError::Decode)?;
            return Ok((status, health));
        }
        Err(api_error(response).await)
    }

    /// Run both models on one feature vector
    pub async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult> {
        self.post("predict", request).await
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        decode(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path)?;
        let response = self
            .send(self.client.post(url.clone()).json(body), &url)
            .await?;
        decode(response).await
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<Response> {
        request.send().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    response.json().await.map_err(ClientError::Decode)
}

/// Turn an error response into its `detail` text when there is one
async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(ErrorResponse {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorResponse { detail }) => detail.to_string(),
        Err(_) => body,
    };
    ClientError::Api { status, detail }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use predictor_lib::FeatureVector;

    fn request() -> PredictRequest {
        PredictRequest {
            features: FeatureVector::new([
                63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0,
            ]),
        }
    }

    #[tokio::test]
    async fn test_status_reads_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Heart Disease Prediction API is running."}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let status = client.status().await.unwrap();

        assert_eq!(status.message, "Heart Disease Prediction API is running.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_predict_posts_features() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "features": [63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"logistic_regression": 1, "decision_tree": 0}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let result = client.predict(&request()).await.unwrap();

        assert_eq!(result.logistic_regression, 1);
        assert_eq!(result.decision_tree, 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/predict")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail": "Models not loaded"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.predict(&request()).await.unwrap_err();

        match err {
            ClientError::Api { status, detail } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(detail, "Models not loaded");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_kept_verbatim() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.status().await.unwrap_err();
        assert_eq!(err.to_string(), "API error (502 Bad Gateway): bad gateway");
    }

    #[tokio::test]
    async fn test_health_accepts_503_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/healthz")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status": "unhealthy", "components": {"artifacts": {"status": "unhealthy", "message": "failed to read artifact", "last_check_timestamp": 0}}}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let (status, health) = client.health().await.unwrap();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            health.components["artifacts"].message.as_deref(),
            Some("failed to read artifact")
        );
    }

    #[tokio::test]
    async fn test_path_prefix_is_kept_for_every_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let root = server
            .mock("GET", "/api/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Heart Disease Prediction API is running."}"#)
            .expect(2)
            .create_async()
            .await;
        let predict = server
            .mock("POST", "/api/predict")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"logistic_regression": 0, "decision_tree": 0}"#)
            .expect(2)
            .create_async()
            .await;

        for base in [format!("{}/api/", server.url()), format!("{}/api", server.url())] {
            let client = ApiClient::new(&base).unwrap();
            assert_eq!(client.url("").unwrap().path(), "/api/");
            assert_eq!(client.url("healthz").unwrap().path(), "/api/healthz");

            client.status().await.unwrap();
            client.predict(&request()).await.unwrap();
        }

        root.assert_async().await;
        predict.assert_async().await;
    }

    #[test]
    fn test_root_url_without_prefix() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.url("").unwrap().as_str(), "http://localhost:8000/");
        assert_eq!(
            client.url("predict").unwrap().as_str(),
            "http://localhost:8000/predict"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ClientError::InvalidUrl { .. })
        ));
    }
}
