//! Kit (product) form fields: parsing, duplicate/unknown-field rejection,
//! and range validation.
//!
//! Multipart uploads arrive as loose `name -> text` pairs. [`KitFieldSet`]
//! collects them into fixed slots so that anything outside the known field
//! list is rejected at the boundary, then [`KitFieldSet::into_fields`]
//! produces a validated [`KitFields`].

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const FIELD_NAME: &str = "name";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_DISCOUNT: &str = "discount";
pub const FIELD_BRAND: &str = "brand";

/// Multipart field carrying the uploaded image file.
pub const FIELD_IMAGE: &str = "image";

/// Every text field accepted alongside the image, in submission order.
pub const TEXT_FIELDS: &[&str] = &[
    FIELD_NAME,
    FIELD_DESCRIPTION,
    FIELD_CATEGORY,
    FIELD_PRICE,
    FIELD_DISCOUNT,
    FIELD_BRAND,
];

/// Upper bound for `discount`, expressed as a percentage.
pub const MAX_DISCOUNT_PERCENT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Numeric parsing
// ---------------------------------------------------------------------------

/// Parse a numeric form value from its leading number.
///
/// Leading whitespace is skipped and the longest numeric prefix is read
/// (sign, digits, optional fraction, optional exponent), so trailing text
/// such as a unit is ignored. Missing input, input with no leading number,
/// and non-finite results all fall back to `0`.
///
/// ```
/// use kitstore_core::kit::parse_amount;
///
/// assert_eq!(parse_amount(Some("19.99")), 19.99);
/// assert_eq!(parse_amount(Some("1.5kg")), 1.5);
/// assert_eq!(parse_amount(Some("")), 0.0);
/// assert_eq!(parse_amount(Some("abc")), 0.0);
/// assert_eq!(parse_amount(None), 0.0);
/// ```
pub fn parse_amount(raw: Option<&str>) -> f64 {
    raw.map(|s| numeric_prefix(s.trim_start()))
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// The longest prefix of `s` that reads as a decimal number, or `""`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start
            + bytes[start..]
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .count()
    };

    let mut end = match bytes.first() {
        Some(b'+' | b'-') => 1,
        _ => 0,
    };
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    &s[..end]
}

// ---------------------------------------------------------------------------
// Validated fields
// ---------------------------------------------------------------------------

/// Validated kit attributes, ready to be combined with stored image names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct KitFields {
    pub name: String,
    pub description: String,
    pub category: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(
        min = 0.0,
        max = MAX_DISCOUNT_PERCENT,
        message = "discount must be between 0 and 100"
    ))]
    pub discount: f64,
    pub brand: String,
}

// ---------------------------------------------------------------------------
// Field accumulator
// ---------------------------------------------------------------------------

/// Collects raw text fields from a multipart body.
///
/// Each known field may be set once. Missing text fields become empty
/// strings; missing numeric fields become `0`.
#[derive(Debug, Default)]
pub struct KitFieldSet {
    name: Option<String>,
    description: Option<String>,
    category: Option<String>,
    price: Option<String>,
    discount: Option<String>,
    brand: Option<String>,
}

impl KitFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a text field.
    ///
    /// Returns [`CoreError::Validation`] for a field name outside
    /// [`TEXT_FIELDS`] or for a field that was already set.
    pub fn insert(&mut self, field: &str, value: String) -> Result<(), CoreError> {
        let slot = match field {
            FIELD_NAME => &mut self.name,
            FIELD_DESCRIPTION => &mut self.description,
            FIELD_CATEGORY => &mut self.category,
            FIELD_PRICE => &mut self.price,
            FIELD_DISCOUNT => &mut self.discount,
            FIELD_BRAND => &mut self.brand,
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown field '{other}'. Expected one of: {TEXT_FIELDS:?} or '{FIELD_IMAGE}'"
                )));
            }
        };

        if slot.is_some() {
            return Err(CoreError::Validation(format!(
                "Field '{field}' was sent more than once"
            )));
        }

        *slot = Some(value);
        Ok(())
    }

    /// Convert the collected values into validated [`KitFields`].
    pub fn into_fields(self) -> Result<KitFields, CoreError> {
        let fields = KitFields {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            price: parse_amount(self.price.as_deref()),
            discount: parse_amount(self.discount.as_deref()),
            brand: self.brand.unwrap_or_default(),
        };

        fields
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        Ok(fields)
    }
}
