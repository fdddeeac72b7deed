//! AWS CodeArtifact integration tests.
//!
//! These tests talk to a real CodeArtifact domain and need credentials in the
//! environment plus:
//!
//!   PARTIFACT_TEST_DOMAIN   CodeArtifact domain name
//!   PARTIFACT_TEST_ACCOUNT  domain owner account id
//!   PARTIFACT_TEST_REGION   region (default: us-east-1)
//!   PARTIFACT_TEST_REPO     repository name
//!   PARTIFACT_TEST_ROLE     optional role name to assume
//!
//! Run with:
//!   cargo test --test integration_aws --features aws -- --ignored

#![cfg(feature = "aws")]

use partifact::providers::aws::AwsProvider;
use partifact::session::{CredentialProvider, SessionRequest};
use partifact::{acquire_token, PartifactError, RepositoryDescriptor};

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{} must be set", name))
}

fn descriptor() -> RepositoryDescriptor {
    let region = std::env::var("PARTIFACT_TEST_REGION").unwrap_or_else(|_| "us-east-1".to_string());

    RepositoryDescriptor::new(
        env("PARTIFACT_TEST_DOMAIN"),
        env("PARTIFACT_TEST_ACCOUNT"),
        region,
        env("PARTIFACT_TEST_REPO"),
    )
    .expect("test repository environment is valid")
}

#[tokio::test]
#[ignore] // Run only when AWS credentials are available
async fn test_aws_token_with_default_credentials() {
    let token = acquire_token(&AwsProvider::new(), &descriptor())
        .await
        .expect("Failed to acquire token");

    assert!(!token.token().is_empty());
    assert!(token.expires_at().is_some());
}

#[tokio::test]
#[ignore]
async fn test_aws_token_via_assumed_role() {
    let Ok(role) = std::env::var("PARTIFACT_TEST_ROLE") else {
        return;
    };

    let descriptor = descriptor().with_role_name(Some(role));
    let token = acquire_token(&AwsProvider::new(), &descriptor)
        .await
        .expect("Failed to acquire token through role");

    assert!(!token.token().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_aws_unknown_domain_is_auth_failure() {
    let descriptor = RepositoryDescriptor::new(
        "partifact-domain-that-does-not-exist",
        env("PARTIFACT_TEST_ACCOUNT"),
        "us-east-1",
        "missing",
    )
    .unwrap();

    let result = acquire_token(&AwsProvider::new(), &descriptor).await;
    assert!(matches!(result, Err(PartifactError::AuthFailure(_))));
}

#[tokio::test]
#[ignore]
async fn test_aws_session_region() {
    let session = AwsProvider::new()
        .open_session(SessionRequest::profile(None, "eu-west-1"))
        .await
        .expect("Failed to open session");

    assert_eq!(session.region(), "eu-west-1");
}
