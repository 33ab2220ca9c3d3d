/// Errors from the storefront client layer.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// The HTTP request itself failed (network, DNS, TLS, body decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Storefront API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A base or page URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A form field name the create-kit form does not have.
    #[error("Unknown form field '{0}'")]
    UnknownField(String),
}
