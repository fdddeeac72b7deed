//! AWS credential provider implementation.

use crate::providers::aws::AwsSession;
use crate::session::{CredentialProvider, CredentialSource, Session, SessionRequest};
use crate::Result;
use async_trait::async_trait;
use aws_sdk_codeartifact::config::Credentials;

/// Environment variable overriding the AWS endpoint (for local test stacks).
pub const ENDPOINT_ENV: &str = "PARTIFACT_ENDPOINT_URL";

const ASSUMED_ROLE_PROVIDER: &str = "partifact-assume-role";

/// Opens sessions through the AWS SDK credential chain.
#[derive(Debug, Clone, Default)]
pub struct AwsProvider {
    endpoint: Option<String>,
}

impl AwsProvider {
    /// Creates a provider, honouring `PARTIFACT_ENDPOINT_URL` if set.
    pub fn new() -> Self {
        Self {
            endpoint: std::env::var(ENDPOINT_ENV).ok().filter(|e| !e.is_empty()),
        }
    }

    /// Sends every request to `endpoint` instead of the regional AWS endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

#[async_trait]
impl CredentialProvider for AwsProvider {
    fn name(&self) -> &str {
        "aws"
    }

    async fn open_session(&self, request: SessionRequest) -> Result<Box<dyn Session>> {
        let mut config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(request.region.clone()));

        match request.source {
            CredentialSource::Profile(Some(ref profile)) => {
                config_loader = config_loader.profile_name(profile);
            }
            CredentialSource::Profile(None) => {}
            CredentialSource::Temporary(ref credentials) => {
                config_loader = config_loader.credentials_provider(Credentials::new(
                    credentials.access_key_id.clone(),
                    credentials.secret_access_key.clone(),
                    Some(credentials.session_token.clone()),
                    credentials.expires_at.map(std::time::SystemTime::from),
                    ASSUMED_ROLE_PROVIDER,
                ));
            }
        }

        if let Some(ref endpoint) = self.endpoint {
            config_loader = config_loader.endpoint_url(endpoint);
        }

        let config = config_loader.load().await;
        Ok(Box::new(AwsSession::new(config, request.region)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_endpoint() {
        let provider = AwsProvider::default().with_endpoint("http://localhost:4566");
        assert_eq!(provider.endpoint.as_deref(), Some("http://localhost:4566"));
        assert_eq!(provider.name(), "aws");
    }
}
