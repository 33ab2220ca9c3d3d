//! HTTP client for the kitstore server endpoints used by the storefront.
//!
//! Wraps `POST /api/kits` and `GET /api/verify` using [`reqwest`]. Each call
//! is a single request: no retry, no cancellation.

use reqwest::multipart::Form;
use reqwest::Url;
use serde::Deserialize;

use crate::error::StorefrontError;
use crate::payment::VerifyResponse;

/// A kit as returned in the `data` field of a successful create response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedKit {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    pub discount: f64,
    #[serde(default)]
    pub brand: String,
    pub images: Vec<String>,
}

/// `{ status, message, data? }` envelope as seen by the client.
#[derive(Debug, Deserialize)]
struct EnvelopeBody<T> {
    message: Option<String>,
    data: Option<T>,
}

/// Result of a successful create-kit submission.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Server message, if the body could be read.
    pub message: Option<String>,
    /// The created kit, if the body could be read.
    pub kit: Option<CreatedKit>,
}

/// Client for the kitstore HTTP API.
#[derive(Debug, Clone)]
pub struct StorefrontApi {
    client: reqwest::Client,
    base_url: Url,
}

impl StorefrontApi {
    /// Create a client for a server base URL, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, StorefrontError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, StorefrontError> {
        let mut base = Url::parse(base_url).map_err(|e| StorefrontError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            base_url: base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submit the create-kit form.
    ///
    /// Any 2xx status counts as success; its body is read leniently. A
    /// non-2xx status yields [`StorefrontError::Api`] with the raw body.
    pub async fn create_kit(&self, form: Form) -> Result<SubmitReceipt, StorefrontError> {
        let response = self
            .client
            .post(self.endpoint("api/kits")?)
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.text().await.unwrap_or_default();
        let envelope = serde_json::from_str::<EnvelopeBody<CreatedKit>>(&body).ok();

        Ok(SubmitReceipt {
            message: envelope.as_ref().and_then(|e| e.message.clone()),
            kit: envelope.and_then(|e| e.data),
        })
    }

    /// Ask the verification endpoint about a transaction.
    ///
    /// Sends `GET /api/verify?tx_ref=<tx_ref>`.
    pub async fn verify_payment(&self, tx_ref: &str) -> Result<VerifyResponse, StorefrontError> {
        let mut url = self.endpoint("api/verify")?;
        url.query_pairs_mut().append_pair("tx_ref", tx_ref);

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<VerifyResponse>().await?)
    }

    // ---- private helpers ----

    fn endpoint(&self, path: &str) -> Result<Url, StorefrontError> {
        self.base_url
            .join(path)
            .map_err(|e| StorefrontError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Ensure the response has a success status code, or return
    /// [`StorefrontError::Api`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorefrontError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorefrontError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
