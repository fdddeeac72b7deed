//! Mock credential provider for testing.
//!
//! This provider keeps everything in memory and records every session it
//! opens and every role it assumes, so tests can assert on call counts and
//! parameters without touching the network.

use crate::session::{
    AuthorizationToken, CredentialProvider, Session, SessionRequest, TemporaryCredentials,
};
use crate::{PartifactError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct MockState {
    sessions: Vec<SessionRequest>,
    assumed_roles: Vec<String>,
    repositories: HashMap<(String, String), String>,
}

/// Mock credential provider.
///
/// # Example
///
/// ```
/// use partifact::providers::mock::MockProvider;
/// use partifact::{acquire_token, RepositoryDescriptor};
///
/// #[tokio::main]
/// async fn main() -> partifact::Result<()> {
///     let provider = MockProvider::new();
///     provider.add_repository("my-domain", "1234", "test-token").await;
///
///     let descriptor = RepositoryDescriptor::new("my-domain", "1234", "eu-west-1", "repo")?
///         .with_role_name(Some("reader".to_string()));
///     let token = acquire_token(&provider, &descriptor).await?;
///
///     assert_eq!(token.token(), "test-token");
///     assert_eq!(provider.sessions().await.len(), 2);
///     assert_eq!(provider.assumed_roles().await, vec!["arn:aws:iam::1234:role/reader"]);
///     Ok(())
/// }
/// ```
pub struct MockProvider {
    state: Arc<RwLock<MockState>>,

    /// Error message to return from `open_session()`
    pub session_error: Option<String>,
    /// Error message to return from `assume_role()`
    pub assume_role_error: Option<String>,
}

impl MockProvider {
    /// Creates a provider with no repositories.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::default())),
            session_error: None,
            assume_role_error: None,
        }
    }

    /// Registers the token returned for `(domain, domain_owner)`.
    pub async fn add_repository(
        &self,
        domain: impl Into<String>,
        domain_owner: impl Into<String>,
        token: impl Into<String>,
    ) {
        let mut state = self.state.write().await;
        state
            .repositories
            .insert((domain_owner.into(), domain.into()), token.into());
    }

    /// Every session opened so far, in order.
    pub async fn sessions(&self) -> Vec<SessionRequest> {
        self.state.read().await.sessions.clone()
    }

    /// Every role ARN assumed so far, in order.
    pub async fn assumed_roles(&self) -> Vec<String> {
        self.state.read().await.assumed_roles.clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open_session(&self, request: SessionRequest) -> Result<Box<dyn Session>> {
        if let Some(ref err) = self.session_error {
            return Err(PartifactError::AuthFailure(err.clone()));
        }

        let region = request.region.clone();
        self.state.write().await.sessions.push(request);

        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
            region,
            assume_role_error: self.assume_role_error.clone(),
        }))
    }
}

/// Session handed out by [`MockProvider`].
pub struct MockSession {
    state: Arc<RwLock<MockState>>,
    region: String,
    assume_role_error: Option<String>,
}

#[async_trait]
impl Session for MockSession {
    fn region(&self) -> &str {
        &self.region
    }

    async fn assume_role(&self, role_arn: &str, _session_name: &str) -> Result<TemporaryCredentials> {
        if let Some(ref err) = self.assume_role_error {
            return Err(PartifactError::AuthFailure(err.clone()));
        }

        self.state.write().await.assumed_roles.push(role_arn.to_string());

        Ok(TemporaryCredentials {
            access_key_id: "test_access_key".to_string(),
            secret_access_key: "test_secret_key".to_string(),
            session_token: "test_token".to_string(),
            expires_at: None,
        })
    }

    async fn authorization_token(
        &self,
        domain: &str,
        domain_owner: &str,
    ) -> Result<AuthorizationToken> {
        let state = self.state.read().await;
        state
            .repositories
            .get(&(domain_owner.to_string(), domain.to_string()))
            .map(|token| AuthorizationToken::new(token.clone(), None))
            .ok_or_else(|| {
                PartifactError::AuthFailure(format!(
                    "no repository registered for domain {} owned by {}",
                    domain, domain_owner
                ))
            })
    }
}
