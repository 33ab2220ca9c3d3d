//! Client-side storefront flows.
//!
//! - [`form::CreateKitForm`] holds the create-kit form state and submits it
//!   to `POST /api/kits` as multipart form data.
//! - [`verify::PaymentVerification`] drives the payment verification view:
//!   it reads `tx_ref` from the page URL, calls `GET /api/verify`, and
//!   renders the outcome.
//!
//! Both talk to the server through [`api::StorefrontApi`].

pub mod api;
pub mod error;
pub mod form;
pub mod payment;
pub mod verify;
