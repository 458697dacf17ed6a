//! Construction and configuration error tests for the Primer client

use primer::{PrimerClient, PrimerClientBuilder, PrimerError};
use std::time::Duration;

#[test]
fn test_blank_api_key_rejected() {
    for api_key in ["", " ", "\t\n"] {
        let error = PrimerClient::builder()
            .with_api_key(api_key)
            .with_base_url("https://api.example.com")
            .build()
            .unwrap_err();
        assert!(
            matches!(error, PrimerError::CredentialsMissing),
            "blank API key {:?} MUST be rejected - actual: {}",
            api_key,
            error
        );
    }
}

#[test]
fn test_blank_base_url_rejected() {
    for base_url in ["", "   "] {
        let error = PrimerClient::builder()
            .with_base_url(base_url)
            .with_api_key("key")
            .build()
            .unwrap_err();
        assert!(
            matches!(error, PrimerError::BaseUrlMissing),
            "blank base URL {:?} MUST be rejected - actual: {}",
            base_url,
            error
        );
    }
}

#[test]
fn test_setter_order_does_not_matter() {
    let first = PrimerClient::builder()
        .with_api_key("key")
        .with_base_url("https://api.example.com")
        .build()
        .unwrap();
    let second = PrimerClient::builder()
        .with_base_url("https://api.example.com")
        .with_api_key("key")
        .build()
        .unwrap();
    assert_eq!(first.base_url(), second.base_url());
}

#[test]
fn test_both_missing_reports_credentials_first() {
    let error = PrimerClientBuilder::new().build().unwrap_err();
    assert!(matches!(error, PrimerError::CredentialsMissing));
    assert_eq!(error.to_string(), "API Key credentials missing");
}

#[test]
fn test_last_setter_wins() {
    let error = PrimerClient::builder()
        .with_api_key("key")
        .with_base_url("https://api.example.com")
        .with_api_key("")
        .build()
        .unwrap_err();
    assert!(matches!(error, PrimerError::CredentialsMissing));
}

// All environment cases live in one test: the variables are process-wide.
#[test]
fn test_from_env() {
    std::env::set_var("PRIMER_API_KEY", "env-key");
    std::env::set_var("PRIMER_BASE_URL", "https://api.sandbox.primer.io/");
    std::env::set_var("PRIMER_TIMEOUT_SECS", "15");

    let builder = PrimerClientBuilder::from_env().unwrap();
    assert!(
        !format!("{:?}", builder).contains("env-key"),
        "Builder Debug output MUST NOT contain the API key - actual: {:?}",
        builder
    );
    let client = builder.build().unwrap();
    assert_eq!(client.base_url(), "https://api.sandbox.primer.io");
    assert_eq!(client.timeout(), Some(Duration::from_secs(15)));

    std::env::set_var("PRIMER_TIMEOUT_SECS", "soon");
    let error = PrimerClientBuilder::from_env().unwrap_err();
    assert!(
        error.to_string().contains("PRIMER_TIMEOUT_SECS"),
        "Error message MUST name the variable - actual: {}",
        error
    );

    std::env::remove_var("PRIMER_TIMEOUT_SECS");
    std::env::remove_var("PRIMER_API_KEY");
    let error = PrimerClientBuilder::from_env().unwrap().build().unwrap_err();
    assert!(matches!(error, PrimerError::CredentialsMissing));

    std::env::remove_var("PRIMER_BASE_URL");
}
