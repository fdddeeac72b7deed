//! Credential sessions used to obtain CodeArtifact tokens.
//!
//! This module defines the [`CredentialProvider`] and [`Session`] traits that
//! sit between the token acquisition logic and the cloud SDK. The AWS
//! implementation lives in [`crate::providers::aws`]; an in-memory provider
//! that records every session it opens lives in [`crate::providers::mock`].

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// Opens credential sessions.
///
/// Every call to [`open_session`](Self::open_session) corresponds to one
/// SDK session. Logging in without a role opens one session; logging in
/// through a role opens two.
///
/// # Example
///
/// ```no_run
/// use partifact::providers::aws::AwsProvider;
/// use partifact::session::{CredentialProvider, SessionRequest};
///
/// #[tokio::main]
/// async fn main() -> partifact::Result<()> {
///     let provider = AwsProvider::new();
///     let session = provider
///         .open_session(SessionRequest::profile(Some("dev".to_string()), "eu-west-1"))
///         .await?;
///
///     let token = session.authorization_token("my-domain", "123456789012").await?;
///     println!("token expires at {:?}", token.expires_at());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the provider name (e.g., "aws", "mock").
    fn name(&self) -> &str;

    /// Opens a session scoped to the requested region and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`PartifactError::AuthFailure`](crate::PartifactError::AuthFailure)
    /// if the credentials cannot be loaded.
    async fn open_session(&self, request: SessionRequest) -> Result<Box<dyn Session>>;
}

/// An authenticated session with the cloud provider.
#[async_trait]
pub trait Session: Send + Sync {
    /// Region the session is scoped to.
    fn region(&self) -> &str;

    /// Exchanges the session's credentials for temporary role credentials.
    ///
    /// # Errors
    ///
    /// Returns [`PartifactError::AuthFailure`](crate::PartifactError::AuthFailure)
    /// if the role cannot be assumed.
    async fn assume_role(&self, role_arn: &str, session_name: &str) -> Result<TemporaryCredentials>;

    /// Requests a CodeArtifact authorization token for a domain.
    ///
    /// # Errors
    ///
    /// Returns [`PartifactError::AuthFailure`](crate::PartifactError::AuthFailure)
    /// if the request is rejected.
    async fn authorization_token(&self, domain: &str, domain_owner: &str)
        -> Result<AuthorizationToken>;
}

/// Parameters for opening a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    /// Region the session is scoped to
    pub region: String,
    /// Where the session's credentials come from
    pub source: CredentialSource,
}

impl SessionRequest {
    /// Session using the default credential chain, optionally for a named profile.
    pub fn profile(profile: Option<String>, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            source: CredentialSource::Profile(profile),
        }
    }

    /// Session using temporary credentials from an assumed role.
    pub fn temporary(credentials: TemporaryCredentials, region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            source: CredentialSource::Temporary(credentials),
        }
    }

    /// Profile name, if this is a profile session with an explicit profile.
    pub fn profile_name(&self) -> Option<&str> {
        match &self.source {
            CredentialSource::Profile(profile) => profile.as_deref(),
            CredentialSource::Temporary(_) => None,
        }
    }
}

/// Source of credentials for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Default credential chain; `Some` selects a named profile.
    Profile(Option<String>),
    /// Explicit temporary credentials.
    Temporary(TemporaryCredentials),
}

/// Temporary credentials returned by a role assumption.
#[derive(Clone, PartialEq, Eq)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A CodeArtifact authorization token.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizationToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AuthorizationToken {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// The bearer token string.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// When the token expires, if the provider reported it.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Debug for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let token = AuthorizationToken::new("super-secret", None);
        assert!(!format!("{:?}", token).contains("super-secret"));

        let credentials = TemporaryCredentials {
            access_key_id: "AKIA".to_string(),
            secret_access_key: "secret-key".to_string(),
            session_token: "session-token".to_string(),
            expires_at: None,
        };
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("AKIA"));
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("session-token"));
    }

    #[test]
    fn test_profile_name() {
        let request = SessionRequest::profile(Some("dev".to_string()), "eu-west-1");
        assert_eq!(request.profile_name(), Some("dev"));
        assert_eq!(request.region, "eu-west-1");

        let request = SessionRequest::profile(None, "eu-west-1");
        assert_eq!(request.profile_name(), None);
    }
}
