//! Payment verification view model.
//!
//! ```text
//!   from_url ──(tx_ref present)──> Verifying ──verify()──> Successful
//!       │                                        └───────> Failed
//!       └─────(tx_ref missing)───> InvalidRequest
//! ```
//!
//! `Successful`, `Failed`, and `InvalidRequest` are terminal. Exactly one
//! request is issued per view.

use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::api::StorefrontApi;
use crate::error::StorefrontError;
use crate::payment::{PaymentInfo, VerifyResponse};

/// Query parameter carrying the transaction reference.
pub const TX_REF_PARAM: &str = "tx_ref";

/// Shown when the endpoint answered but did not confirm the payment.
pub const VERIFICATION_FAILED_MESSAGE: &str =
    "Payment verification failed. Please try again or contact support.";

/// Shown when the request failed, returned a non-2xx status, or sent an
/// unreadable body.
pub const VERIFICATION_ERROR_MESSAGE: &str =
    "Something went wrong during verification. Please try again later.";

/// Shown when the page URL carries no transaction reference.
pub const MISSING_TX_REF_MESSAGE: &str =
    "No transaction reference was provided, so this payment cannot be verified.";

/// Base used to resolve relative page URLs such as `/verify?tx_ref=...`.
const RELATIVE_URL_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq)]
pub enum VerificationState {
    Verifying,
    Successful(PaymentInfo),
    Failed { message: String },
    InvalidRequest { message: String },
}

impl VerificationState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VerificationState::Verifying)
    }
}

/// State of one payment verification page visit.
#[derive(Debug, Clone)]
pub struct PaymentVerification {
    tx_ref: Option<String>,
    state: VerificationState,
}

impl PaymentVerification {
    /// Start a view for a transaction reference. A missing or blank
    /// reference goes straight to [`VerificationState::InvalidRequest`].
    pub fn new(tx_ref: Option<String>) -> Self {
        let tx_ref = tx_ref.filter(|t| !t.trim().is_empty());
        let state = match tx_ref {
            Some(_) => VerificationState::Verifying,
            None => VerificationState::InvalidRequest {
                message: MISSING_TX_REF_MESSAGE.to_string(),
            },
        };
        Self { tx_ref, state }
    }

    /// Start a view from the page URL, absolute or relative.
    pub fn from_url(page_url: &str) -> Result<Self, StorefrontError> {
        let url = Url::parse(RELATIVE_URL_BASE)
            .and_then(|base| base.join(page_url))
            .map_err(|e| StorefrontError::InvalidUrl {
                url: page_url.to_string(),
                reason: e.to_string(),
            })?;

        let tx_ref = url
            .query_pairs()
            .find(|(key, _)| key == TX_REF_PARAM)
            .map(|(_, value)| value.into_owned());

        Ok(Self::new(tx_ref))
    }

    pub fn tx_ref(&self) -> Option<&str> {
        self.tx_ref.as_deref()
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Issue the verification request and settle the state.
    ///
    /// Does nothing once the view has reached a terminal state, so at most
    /// one request is sent.
    pub async fn verify(&mut self, api: &StorefrontApi) -> &VerificationState {
        if self.state.is_terminal() {
            return &self.state;
        }
        let Some(tx_ref) = self.tx_ref.clone() else {
            return &self.state;
        };

        let result = api.verify_payment(&tx_ref).await;
        self.apply(result);
        &self.state
    }

    /// Transition from `Verifying` according to the endpoint's answer.
    /// Ignored in any terminal state.
    pub fn apply(&mut self, result: Result<VerifyResponse, StorefrontError>) {
        if self.state.is_terminal() {
            return;
        }

        self.state = match result {
            Ok(VerifyResponse {
                payment_data: Some(info),
            }) => {
                tracing::info!(tx_ref = ?self.tx_ref, reference = %info.reference, "Payment verified");
                VerificationState::Successful(info)
            }
            Ok(VerifyResponse { payment_data: None }) => {
                tracing::info!(tx_ref = ?self.tx_ref, "Payment not confirmed by provider");
                VerificationState::Failed {
                    message: VERIFICATION_FAILED_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                tracing::warn!(tx_ref = ?self.tx_ref, error = %e, "Payment verification error");
                VerificationState::Failed {
                    message: VERIFICATION_ERROR_MESSAGE.to_string(),
                }
            }
        };
    }

    /// Build the user-facing view for the current state.
    pub fn render(&self) -> RenderedView {
        match &self.state {
            VerificationState::Verifying => RenderedView {
                heading: "Verifying Payment...".to_string(),
                tone: Tone::Pending,
                error: None,
                details: Vec::new(),
                pending_note: Some("Verifying payment, please wait...".to_string()),
                back_to_shop: false,
            },
            VerificationState::Successful(info) => RenderedView {
                heading: "Payment Successful".to_string(),
                tone: Tone::Success,
                error: None,
                details: detail_lines(info),
                pending_note: None,
                back_to_shop: true,
            },
            VerificationState::Failed { message } => RenderedView {
                heading: "Payment Failed".to_string(),
                tone: Tone::Danger,
                error: Some(message.clone()),
                details: Vec::new(),
                pending_note: None,
                back_to_shop: true,
            },
            VerificationState::InvalidRequest { message } => RenderedView {
                heading: "Invalid Payment Request".to_string(),
                tone: Tone::Danger,
                error: Some(message.clone()),
                details: Vec::new(),
                pending_note: None,
                back_to_shop: true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Colour of the heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Success,
    Danger,
}

/// One labelled payment attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

/// Everything the verification page displays.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedView {
    pub heading: String,
    pub tone: Tone,
    pub error: Option<String>,
    pub details: Vec<DetailLine>,
    pub pending_note: Option<String>,
    pub back_to_shop: bool,
}

impl fmt::Display for RenderedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        if let Some(error) = &self.error {
            writeln!(f, "{error}")?;
        }
        for line in &self.details {
            writeln!(f, "{}: {}", line.label, line.value)?;
        }
        if let Some(note) = &self.pending_note {
            writeln!(f, "{note}")?;
        }
        if self.back_to_shop {
            writeln!(f, "Back to Shop")?;
        }
        Ok(())
    }
}

fn detail_lines(info: &PaymentInfo) -> Vec<DetailLine> {
    let line = |label, value: String| DetailLine { label, value };
    vec![
        line("Reference", info.reference.clone()),
        line("Transaction Ref", info.tx_ref.clone()),
        line("Amount", format!("{} {}", info.amount, info.currency)),
        line("Charge", info.charge.to_string()),
        line("Type", info.payment_type.clone()),
        line("Method", info.method.clone()),
        line("Email", info.email.clone()),
        line("Name", format!("{} {}", info.first_name, info.last_name)),
        line("Date", format_payment_date(&info.created_at)),
    ]
}

/// Format an RFC 3339 timestamp as `YYYY-MM-DD HH:MM:SS UTC`; anything else
/// is shown as sent.
pub fn format_payment_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn payment() -> PaymentInfo {
        PaymentInfo {
            reference: "FLW-MOCK-1".into(),
            tx_ref: "tx-42".into(),
            amount: 2500.0,
            currency: "NGN".into(),
            charge: 35.5,
            payment_type: "card".into(),
            method: "visa".into(),
            email: "ada@example.com".into(),
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            created_at: "2026-03-01T11:15:00+01:00".into(),
        }
    }

    fn verifying() -> PaymentVerification {
        PaymentVerification::new(Some("tx-42".into()))
    }

    #[test]
    fn tx_ref_starts_verifying() {
        let view = PaymentVerification::from_url("/verify?status=ok&tx_ref=tx-42").unwrap();
        assert_eq!(view.tx_ref(), Some("tx-42"));
        assert_eq!(view.state(), &VerificationState::Verifying);
    }

    #[test]
    fn absolute_url_is_accepted() {
        let view =
            PaymentVerification::from_url("https://shop.example.com/verify?tx_ref=a%20b").unwrap();
        assert_eq!(view.tx_ref(), Some("a b"));
    }

    #[test]
    fn missing_tx_ref_is_invalid_request() {
        let view = PaymentVerification::from_url("/verify").unwrap();
        assert!(view.tx_ref().is_none());
        assert_matches!(
            view.state(),
            VerificationState::InvalidRequest { message } if !message.is_empty()
        );
    }

    #[test]
    fn blank_tx_ref_is_invalid_request() {
        let view = PaymentVerification::from_url("/verify?tx_ref=").unwrap();
        assert_matches!(view.state(), VerificationState::InvalidRequest { .. });
    }

    #[test]
    fn payment_data_moves_to_successful() {
        let mut view = verifying();
        view.apply(Ok(VerifyResponse {
            payment_data: Some(payment()),
        }));
        assert_eq!(view.state(), &VerificationState::Successful(payment()));
    }

    #[test]
    fn missing_payment_data_moves_to_failed() {
        let mut view = verifying();
        view.apply(Ok(VerifyResponse { payment_data: None }));
        assert_eq!(
            view.state(),
            &VerificationState::Failed {
                message: VERIFICATION_FAILED_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn request_error_moves_to_failed() {
        let mut view = verifying();
        view.apply(Err(StorefrontError::Api {
            status: 502,
            body: "bad gateway".into(),
        }));
        assert_matches!(
            view.state(),
            VerificationState::Failed { message } if message == VERIFICATION_ERROR_MESSAGE
        );
    }

    #[test]
    fn terminal_states_ignore_later_results() {
        let mut view = verifying();
        view.apply(Ok(VerifyResponse { payment_data: None }));
        view.apply(Ok(VerifyResponse {
            payment_data: Some(payment()),
        }));
        assert_matches!(view.state(), VerificationState::Failed { .. });
    }

    #[test]
    fn successful_render_lists_every_field_once() {
        let mut view = verifying();
        view.apply(Ok(VerifyResponse {
            payment_data: Some(payment()),
        }));

        let rendered = view.render();
        assert_eq!(rendered.tone, Tone::Success);
        assert!(rendered.error.is_none());
        assert!(rendered.back_to_shop);

        let labels: Vec<&str> = rendered.details.iter().map(|l| l.label).collect();
        assert_eq!(
            labels,
            vec![
                "Reference",
                "Transaction Ref",
                "Amount",
                "Charge",
                "Type",
                "Method",
                "Email",
                "Name",
                "Date"
            ]
        );

        let text = rendered.to_string();
        for needle in [
            "FLW-MOCK-1",
            "tx-42",
            "2500 NGN",
            "35.5",
            "card",
            "visa",
            "ada@example.com",
            "Ada Obi",
            "2026-03-01 10:15:00 UTC",
        ] {
            assert_eq!(text.matches(needle).count(), 1, "{needle} should appear once");
        }
    }

    #[test]
    fn failed_render_shows_error() {
        let mut view = verifying();
        view.apply(Ok(VerifyResponse { payment_data: None }));

        let rendered = view.render();
        assert_eq!(rendered.tone, Tone::Danger);
        assert_eq!(rendered.error.as_deref(), Some(VERIFICATION_FAILED_MESSAGE));
        assert!(rendered.details.is_empty());
    }

    #[test]
    fn verifying_render_shows_pending_note() {
        let rendered = verifying().render();
        assert_eq!(rendered.tone, Tone::Pending);
        assert!(rendered.pending_note.is_some());
        assert!(!rendered.back_to_shop);
    }

    #[test]
    fn unparseable_date_is_shown_raw() {
        assert_eq!(format_payment_date("yesterday"), "yesterday");
    }
}
