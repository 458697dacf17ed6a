//! Request and response types for the Primer payments API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use uuid::Uuid;

/// Status of a payment (and of the transactions attempted for it).
///
/// Statuses added to the API after this release decode as [`PaymentStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Failed,
    Authorized,
    Settling,
    PartiallySettled,
    Settled,
    Declined,
    Cancelled,
    #[serde(untagged)]
    Other(String),
}

impl PaymentStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Authorized => "AUTHORIZED",
            PaymentStatus::Settling => "SETTLING",
            PaymentStatus::PartiallySettled => "PARTIALLY_SETTLED",
            PaymentStatus::Settled => "SETTLED",
            PaymentStatus::Declined => "DECLINED",
            PaymentStatus::Cancelled => "CANCELLED",
            PaymentStatus::Other(status) => status,
        }
    }
}

/// Kind of funding source behind a payment instrument token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentInstrumentType {
    PaymentCard,
    PaypalOrder,
    PaypalBillingAgreement,
    GooglePay,
    GocardlessMandate,
    KlarnaAuthorizationToken,
    KlarnaCustomerToken,
    ApplePay,
    /// Instrument type not listed above, kept verbatim
    #[serde(untagged)]
    Other(String),
}

/// Whether an instrument token can be reused
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    MultiUse,
    SingleUse,
    #[serde(untagged)]
    Other(String),
}

/// Fields shared by every request and response.
///
/// The request id is assigned by the server and read from the response headers; the
/// idempotency key is supplied by the caller and sent as a header. Neither is part of the
/// JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    pub request_id: Option<String>,
    pub idempotency_key: Option<String>,
}

/// A request body together with its envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest<T> {
    pub envelope: Envelope,
    pub body: T,
}

impl<T> ApiRequest<T> {
    /// Wrap a request body with an empty envelope
    pub fn new(body: T) -> Self {
        Self {
            envelope: Envelope::default(),
            body,
        }
    }

    /// Set the idempotency key sent as `X-Idempotency-Key`
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.envelope.idempotency_key = Some(key.into());
        self
    }

    /// Set a freshly generated (UUID v4) idempotency key
    pub fn with_generated_idempotency_key(self) -> Self {
        self.with_idempotency_key(Uuid::new_v4().to_string())
    }

    /// The idempotency key, if one was set
    pub fn idempotency_key(&self) -> Option<&str> {
        self.envelope.idempotency_key.as_deref()
    }
}

/// A decoded response together with its envelope.
///
/// `data` is `None` when the API answered `204 No Content`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub envelope: Envelope,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Value of the `X-Grabkit-Grab-Requestid` response header
    pub fn request_id(&self) -> Option<&str> {
        self.envelope.request_id.as_deref()
    }

    /// Consume the response, returning the decoded payload
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Tokenized funding source used for a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstrument {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_instrument_type: Option<PaymentInstrumentType>,
    /// Instrument-specific data, shape depends on `payment_instrument_type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_instrument_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub three_d_secure_authentication: Option<ThreeDSecureAuthentication>,
}

/// A payment instrument stored server-side for reuse
pub type VaultedPaymentInstrument = PaymentInstrument;

impl PaymentInstrument {
    /// Reference an instrument by token only
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            analytics_id: None,
            token_type: None,
            payment_instrument_type: None,
            payment_instrument_data: None,
            three_d_secure_authentication: None,
        }
    }

    /// Decode the instrument data of a card instrument.
    ///
    /// Returns `Ok(None)` for other instrument types or when no data is attached.
    pub fn card_data(&self) -> crate::Result<Option<PaymentCardToken>> {
        if self.payment_instrument_type != Some(PaymentInstrumentType::PaymentCard) {
            return Ok(None);
        }
        match &self.payment_instrument_data {
            Some(data) => Ok(Some(serde_json::from_value(data.clone())?)),
            None => Ok(None),
        }
    }
}

/// Instrument data of a `PAYMENT_CARD` instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCardToken {
    pub last4_digits: String,
    pub expiration_month: String,
    pub expiration_year: String,
    #[serde(rename = "cardholderName", skip_serializing_if = "Option::is_none")]
    pub cardholder_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_network_tokenized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_data: Option<BinData>,
}

/// Card BIN lookup result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinData {
    pub network: String,
    pub regional_restriction: String,
    pub account_number_type: String,
    pub account_funding_type: String,
    pub prepaid_reloadable_indicator: String,
    pub product_usage_type: String,
    pub product_code: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_currency_code: Option<String>,
}

/// Outcome of a 3-D Secure challenge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreeDSecureAuthentication {
    pub response_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_issued: Option<bool>,
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_line1: String,
    pub city: String,
    pub country_code: String,
    pub postal_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Address {
    /// Create an address from its required fields
    pub fn new(
        address_line1: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            address_line1: address_line1.into(),
            city: city.into(),
            country_code: country_code.into(),
            postal_code: postal_code.into(),
            first_name: None,
            last_name: None,
            address_line2: None,
            state: None,
        }
    }
}

macro_rules! address_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Address);

        impl From<Address> for $name {
            fn from(address: Address) -> Self {
                Self(address)
            }
        }

        impl Deref for $name {
            type Target = Address;

            fn deref(&self) -> &Address {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Address {
                &mut self.0
            }
        }
    };
}

address_kind!(
    /// Address the payment is billed to
    BillingAddress
);
address_kind!(
    /// Address the order is shipped to
    ShippingAddress
);

/// Customer attached to a payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
}

/// One authorization, capture or settlement attempt for a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub processor: String,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_error: Option<PaymentError>,
}

/// Decline or processing failure reported for a payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentError {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub payment_error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decline_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_message: Option<String>,
}

/// Action the customer must complete before the payment can proceed (3DS, redirect)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredAction {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
}

/// Failure of the API's internal workflow, distinct from a processor decline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionError {
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
}

/// A payment as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub order_id: String,
    pub currency_code: String,
    /// Requested amount in minor units
    pub amount: i64,
    pub amount_authorized: i64,
    pub amount_captured: i64,
    pub amount_refunded: i64,
    pub payment_instrument: PaymentInstrument,
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_action: Option<RequiredAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_descriptor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vaulted_payment_instrument: Option<VaultedPaymentInstrument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment_error: Option<PaymentError>,
    /// Serialized as `null` when absent
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_execution_error: Option<WorkflowExecutionError>,
}

impl Payment {
    /// Requested amount in major units, given the currency's minor-unit exponent
    /// (2 for EUR, 0 for JPY).
    ///
    /// Returns `None` when `exponent` exceeds the 28 digits of scale a [`Decimal`] holds.
    pub fn amount_in_major_units(&self, exponent: u32) -> Option<Decimal> {
        Decimal::try_new(self.amount, exponent).ok()
    }

    /// Whether the API is waiting on the customer before the payment can continue
    pub fn requires_action(&self) -> bool {
        self.required_action.is_some()
    }
}

/// Body of `POST /payments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub order_id: String,
    pub currency_code: String,
    /// Amount in minor units
    pub amount: i64,
    pub payment_instrument: PaymentInstrument,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement_descriptor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
}

impl CreatePayment {
    /// Create a payment body from its required fields
    pub fn new(
        order_id: impl Into<String>,
        currency_code: impl Into<String>,
        amount: i64,
        payment_instrument: PaymentInstrument,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            currency_code: currency_code.into(),
            amount,
            payment_instrument,
            statement_descriptor: None,
            customer: None,
            metadata: None,
        }
    }
}

/// Body of `POST /payments/{id}/capture`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePayment {
    pub amount: i64,
    /// No further captures will follow
    #[serde(rename = "final")]
    pub is_final: bool,
}

/// Body of `POST /payments/{id}/cancel`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPayment {
    pub reason: String,
}

/// Body of `POST /payments/{id}/refund`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundPayment {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of `POST /payments/{id}/resume`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayment {
    pub resume_token: String,
}

/// Filters for `GET /payments`, sent as query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchPaymentsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Opaque cursor from a previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl SearchPaymentsQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by order id
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// Filter by currency
    pub fn with_currency_code(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    /// Filter by customer id
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Set page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Continue from a cursor returned by a previous search
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPayment {
    pub data: Vec<PaymentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_cursor: Option<String>,
}

/// Abbreviated payment listed in search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub id: String,
    pub date: DateTime<Utc>,
    pub status: PaymentStatus,
    pub order_id: String,
    pub currency_code: String,
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
}

pub type CreatePaymentRequest = ApiRequest<CreatePayment>;
pub type CapturePaymentRequest = ApiRequest<CapturePayment>;
pub type CancelPaymentRequest = ApiRequest<CancelPayment>;
pub type RefundPaymentRequest = ApiRequest<RefundPayment>;
pub type ResumePaymentRequest = ApiRequest<ResumePayment>;
/// `GET /payments/{id}` has no body; only the envelope is used
pub type GetPaymentRequest = ApiRequest<()>;

pub type PaymentResponse = ApiResponse<Payment>;
pub type SearchPaymentResponse = ApiResponse<SearchPayment>;
