//! # primer - Primer payments API client
//!
//! A Rust client for the Primer payments API. It covers the payment lifecycle
//! (create, capture, cancel, refund, resume, get) plus payment search, mapping each call
//! onto one REST endpoint.
//!
//! ```rust,no_run
//! use primer::{CreatePayment, CreatePaymentRequest, PaymentInstrument, PrimerClient};
//!
//! # async fn run() -> primer::Result<()> {
//! let client = PrimerClient::builder()
//!     .with_api_key("my-api-key")
//!     .with_base_url("https://api.sandbox.primer.io")
//!     .build()?;
//!
//! let request = CreatePaymentRequest::new(CreatePayment::new(
//!     "order-42",
//!     "EUR",
//!     1299,
//!     PaymentInstrument::from_token("instrument-token"),
//! ))
//! .with_generated_idempotency_key();
//!
//! let response = client.create_payment(&request).await?;
//! println!("request id: {:?}", response.request_id());
//! # Ok(())
//! # }
//! ```
//!
//! Every mutating call needs an idempotency key. Non-success responses surface as
//! [`PrimerError::Api`] with the status, raw body and request id; nothing is retried.

pub mod client;
pub mod error;
pub mod payments;
pub mod types;

// Re-exports for convenience
pub use client::{Environment, PrimerClient, PrimerClientBuilder};
pub use error::{ApiError, PrimerError, Result};
pub use types::*;

/// Current version of the client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
