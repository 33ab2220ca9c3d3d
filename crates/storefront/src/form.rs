//! Create-kit form state.
//!
//! Mirrors what the admin page keeps locally: the six field values, an
//! optional selected image, and a result message that is visible for a
//! fixed window after each submission.

use std::time::{Duration, Instant};

use kitstore_core::kit::{
    parse_amount, FIELD_BRAND, FIELD_CATEGORY, FIELD_DESCRIPTION, FIELD_DISCOUNT, FIELD_IMAGE,
    FIELD_NAME, FIELD_PRICE,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::api::{CreatedKit, StorefrontApi};
use crate::error::StorefrontError;

/// How long a result message stays visible after it is set.
pub const MESSAGE_DISPLAY_WINDOW: Duration = Duration::from_secs(4);

pub const SUCCESS_MESSAGE: &str = "Kit created successfully!";

/// Shown when a failure response carries no readable `message`.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Current values of the form inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitFormValues {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub discount: f64,
    pub brand: String,
}

/// A file picked in the image input.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// Result message shown under the form.
#[derive(Debug, Clone)]
pub struct FormMessage {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl FormMessage {
    fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    /// Whether the message is still inside its display window at `now`.
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < MESSAGE_DISPLAY_WINDOW
    }
}

/// What happened on the last submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The server accepted the kit. Carries it when the body was readable.
    Created(Option<CreatedKit>),
    /// The submission failed; the form values were kept.
    Failed,
}

#[derive(Debug, Deserialize)]
struct FailureBody {
    message: String,
}

/// Local state of the create-kit form.
#[derive(Debug, Clone, Default)]
pub struct CreateKitForm {
    values: KitFormValues,
    image: Option<SelectedImage>,
    message: Option<FormMessage>,
}

impl CreateKitForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &KitFormValues {
        &self.values
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    /// Update one input. `price` and `discount` are numeric inputs: an
    /// empty or unparseable value becomes `0`.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), StorefrontError> {
        match name {
            FIELD_NAME => self.values.name = value.to_string(),
            FIELD_DESCRIPTION => self.values.description = value.to_string(),
            FIELD_CATEGORY => self.values.category = value.to_string(),
            FIELD_PRICE => self.values.price = parse_amount(Some(value)),
            FIELD_DISCOUNT => self.values.discount = parse_amount(Some(value)),
            FIELD_BRAND => self.values.brand = value.to_string(),
            other => return Err(StorefrontError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Handle a change on the file input. An empty selection keeps the
    /// previously chosen file.
    pub fn select_image(&mut self, image: Option<SelectedImage>) {
        if let Some(image) = image {
            self.image = Some(image);
        }
    }

    /// The current message, if any, regardless of its display window.
    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    /// The message as it should be displayed at `now`: `None` once the
    /// display window has elapsed.
    pub fn visible_message(&self, now: Instant) -> Option<&FormMessage> {
        self.message.as_ref().filter(|m| m.is_visible_at(now))
    }

    /// Serialize all fields and the optional image as multipart form data.
    pub fn to_multipart(&self) -> Result<Form, StorefrontError> {
        let values = &self.values;
        let mut form = Form::new()
            .text(FIELD_NAME, values.name.clone())
            .text(FIELD_DESCRIPTION, values.description.clone())
            .text(FIELD_CATEGORY, values.category.clone())
            .text(FIELD_PRICE, values.price.to_string())
            .text(FIELD_DISCOUNT, values.discount.to_string())
            .text(FIELD_BRAND, values.brand.clone());

        if let Some(image) = &self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)?;
            form = form.part(FIELD_IMAGE, part);
        }

        Ok(form)
    }

    /// Submit the form once.
    ///
    /// On success the values and image are reset and a success message is
    /// shown. On failure the values are kept and the server's `message` is
    /// shown when it can be read, otherwise a generic message.
    pub async fn submit(&mut self, api: &StorefrontApi) -> SubmitOutcome {
        let result = match self.to_multipart() {
            Ok(form) => api.create_kit(form).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(receipt) => {
                self.values = KitFormValues::default();
                self.image = None;
                self.message = Some(FormMessage::new(SUCCESS_MESSAGE, MessageKind::Success));
                SubmitOutcome::Created(receipt.kit)
            }
            Err(StorefrontError::Api { status, body }) => {
                let text = match serde_json::from_str::<FailureBody>(&body) {
                    Ok(failure) => format!("Error: {}", failure.message),
                    Err(_) => GENERIC_ERROR_MESSAGE.to_string(),
                };
                tracing::debug!(status, message = %text, "Kit submission rejected");
                self.message = Some(FormMessage::new(text, MessageKind::Error));
                SubmitOutcome::Failed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Kit submission failed");
                self.message = Some(FormMessage::new(GENERIC_ERROR_MESSAGE, MessageKind::Error));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn png(name: &str) -> SelectedImage {
        SelectedImage {
            file_name: name.to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn text_fields_are_stored_verbatim() {
        let mut form = CreateKitForm::new();
        form.set_field("name", "Widget").unwrap();
        form.set_field("brand", " Acme ").unwrap();
        assert_eq!(form.values().name, "Widget");
        assert_eq!(form.values().brand, " Acme ");
    }

    #[test]
    fn numeric_fields_are_parsed() {
        let mut form = CreateKitForm::new();
        form.set_field("price", "19.99").unwrap();
        form.set_field("discount", "").unwrap();
        assert_eq!(form.values().price, 19.99);
        assert_eq!(form.values().discount, 0.0);

        form.set_field("price", "abc").unwrap();
        assert_eq!(form.values().price, 0.0);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let mut form = CreateKitForm::new();
        let err = form.set_field("colour", "red").unwrap_err();
        assert_matches!(err, StorefrontError::UnknownField(name) if name == "colour");
    }

    #[test]
    fn empty_selection_keeps_previous_image() {
        let mut form = CreateKitForm::new();
        form.select_image(Some(png("a.png")));
        form.select_image(None);
        assert_eq!(form.image().unwrap().file_name, "a.png");

        form.select_image(Some(png("b.png")));
        assert_eq!(form.image().unwrap().file_name, "b.png");
    }

    #[test]
    fn multipart_accepts_valid_mime() {
        let mut form = CreateKitForm::new();
        form.select_image(Some(png("a.png")));
        assert!(form.to_multipart().is_ok());
    }

    #[test]
    fn multipart_rejects_invalid_mime() {
        let mut form = CreateKitForm::new();
        form.select_image(Some(SelectedImage {
            mime_type: "not a mime".to_string(),
            ..png("a.png")
        }));
        assert_matches!(form.to_multipart(), Err(StorefrontError::Request(_)));
    }

    #[test]
    fn message_expires_after_window() {
        let message = FormMessage::new("done", MessageKind::Success);
        let shown = message.shown_at;

        assert!(message.is_visible_at(shown));
        assert!(message.is_visible_at(shown + Duration::from_millis(3999)));
        assert!(!message.is_visible_at(shown + MESSAGE_DISPLAY_WINDOW));
    }

    #[test]
    fn visible_message_filters_expired() {
        let mut form = CreateKitForm::new();
        assert!(form.visible_message(Instant::now()).is_none());

        form.message = Some(FormMessage::new("done", MessageKind::Success));
        let shown = form.message().unwrap().shown_at;
        assert!(form.visible_message(shown).is_some());
        assert!(form
            .visible_message(shown + Duration::from_secs(5))
            .is_none());
    }
}
