//! Payment operations exposed by [`PrimerClient`]
//!
//! Each method maps to one endpoint of the payments API. Mutating calls refuse to run
//! without an idempotency key; no request is sent in that case.

use crate::client::PrimerClient;
use crate::types::*;
use crate::{PrimerError, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

/// Characters escaped when a payment id is placed in a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path of a single payment, with `suffix` appended (e.g. `"/capture"`)
pub(crate) fn payment_path(payment_id: &str, suffix: &str) -> String {
    format!(
        "/payments/{}{}",
        utf8_percent_encode(payment_id, PATH_SEGMENT),
        suffix
    )
}

impl PrimerClient {
    /// Create and authorize a payment (`POST /payments`)
    pub async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<PaymentResponse> {
        self.post_mutation("/payments", request).await
    }

    /// Capture an authorized payment (`POST /payments/{id}/capture`)
    pub async fn capture_payment(
        &self,
        payment_id: &str,
        request: &CapturePaymentRequest,
    ) -> Result<PaymentResponse> {
        self.post_mutation(&payment_path(payment_id, "/capture"), request)
            .await
    }

    /// Cancel a payment that has not been settled (`POST /payments/{id}/cancel`)
    pub async fn cancel_payment(
        &self,
        payment_id: &str,
        request: &CancelPaymentRequest,
    ) -> Result<PaymentResponse> {
        self.post_mutation(&payment_path(payment_id, "/cancel"), request)
            .await
    }

    /// Refund a settled payment, fully or in part (`POST /payments/{id}/refund`)
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        request: &RefundPaymentRequest,
    ) -> Result<PaymentResponse> {
        self.post_mutation(&payment_path(payment_id, "/refund"), request)
            .await
    }

    /// Resume a payment paused on a required action (`POST /payments/{id}/resume`)
    pub async fn resume_payment(
        &self,
        payment_id: &str,
        request: &ResumePaymentRequest,
    ) -> Result<PaymentResponse> {
        self.post_mutation(&payment_path(payment_id, "/resume"), request)
            .await
    }

    /// Fetch a payment (`GET /payments/{id}`).
    ///
    /// No idempotency key is required. When none is set the header is still sent, empty.
    pub async fn get_payment(
        &self,
        payment_id: &str,
        request: &GetPaymentRequest,
    ) -> Result<PaymentResponse> {
        let idempotency_key = request.idempotency_key().unwrap_or_default();
        self.get::<(), Payment>(idempotency_key, &payment_path(payment_id, ""), None)
            .await
    }

    /// List payments matching `query` (`GET /payments`).
    ///
    /// Returns a single page; use the returned cursors to request neighbouring pages.
    pub async fn search_payments(
        &self,
        query: &SearchPaymentsQuery,
    ) -> Result<SearchPaymentResponse> {
        self.get("", "/payments", Some(query)).await
    }

    async fn post_mutation<T>(
        &self,
        path: &str,
        request: &ApiRequest<T>,
    ) -> Result<PaymentResponse>
    where
        T: Serialize,
    {
        let idempotency_key = match request.idempotency_key() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(PrimerError::IdempotencyKeyMissing),
        };
        self.post(idempotency_key, path, Some(&request.body)).await
    }
}
