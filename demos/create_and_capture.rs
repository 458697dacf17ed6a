//! Create a payment and capture it in full.
//!
//! Reads `PRIMER_API_KEY` and `PRIMER_BASE_URL` (optionally `PRIMER_TIMEOUT_SECS`) and the
//! instrument token from the first argument:
//!
//! ```sh
//! PRIMER_API_KEY=... PRIMER_BASE_URL=https://api.sandbox.primer.io \
//!     cargo run --example create_and_capture -- <instrument-token>
//! ```

use primer::{
    CapturePayment, CapturePaymentRequest, CreatePayment, CreatePaymentRequest,
    PaymentInstrument, PaymentStatus, PrimerClientBuilder, PrimerError,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let token = std::env::args()
        .nth(1)
        .ok_or("usage: create_and_capture <instrument-token>")?;
    let client = PrimerClientBuilder::from_env()?.build()?;

    let create = CreatePaymentRequest::new(CreatePayment::new(
        "demo-order-1",
        "EUR",
        1299,
        PaymentInstrument::from_token(token),
    ))
    .with_generated_idempotency_key();

    let response = client.create_payment(&create).await?;
    let Some(payment) = response.data else {
        println!("No payment returned (request {:?})", response.envelope.request_id);
        return Ok(());
    };
    let amount = payment
        .amount_in_major_units(2)
        .map(|amount| amount.to_string())
        .unwrap_or_else(|| payment.amount.to_string());
    println!(
        "Created payment {} with status {} for {} {}",
        payment.id,
        payment.status.as_str(),
        amount,
        payment.currency_code
    );

    if payment.status != PaymentStatus::Authorized {
        return Ok(());
    }

    let capture = CapturePaymentRequest::new(CapturePayment {
        amount: payment.amount,
        is_final: true,
    })
    .with_generated_idempotency_key();

    match client.capture_payment(&payment.id, &capture).await {
        Ok(response) => {
            if let Some(captured) = response.data {
                println!(
                    "Captured {} (status {})",
                    captured.amount_captured,
                    captured.status.as_str()
                );
            }
        }
        Err(PrimerError::Api(error)) => {
            println!(
                "Capture rejected with {} (request {:?}): {}",
                error.status, error.request_id, error.message
            );
        }
        Err(other) => return Err(other.into()),
    }

    Ok(())
}
