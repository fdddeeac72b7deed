//! AWS session implementation.

use crate::session::{AuthorizationToken, Session, TemporaryCredentials};
use crate::{PartifactError, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use chrono::{DateTime, Utc};

/// A loaded AWS SDK configuration scoped to one region.
///
/// Clients are created per call; the SDK refreshes profile credentials
/// internally.
#[derive(Debug, Clone)]
pub struct AwsSession {
    config: SdkConfig,
    region: String,
}

impl AwsSession {
    pub fn new(config: SdkConfig, region: String) -> Self {
        Self { config, region }
    }
}

fn to_chrono(secs: i64, nanos: u32) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, nanos)
}

#[async_trait]
impl Session for AwsSession {
    fn region(&self) -> &str {
        &self.region
    }

    async fn assume_role(&self, role_arn: &str, session_name: &str) -> Result<TemporaryCredentials> {
        let client = aws_sdk_sts::Client::new(&self.config);

        let response = client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send()
            .await
            .map_err(|e| {
                PartifactError::AuthFailure(format!(
                    "failed to assume role {}: {}",
                    role_arn,
                    aws_sdk_sts::error::DisplayErrorContext(e)
                ))
            })?;

        let credentials = response.credentials().ok_or_else(|| {
            PartifactError::AuthFailure(format!("assuming {} returned no credentials", role_arn))
        })?;

        let expiration = credentials.expiration();
        Ok(TemporaryCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expires_at: to_chrono(expiration.secs(), expiration.subsec_nanos()),
        })
    }

    async fn authorization_token(
        &self,
        domain: &str,
        domain_owner: &str,
    ) -> Result<AuthorizationToken> {
        let client = aws_sdk_codeartifact::Client::new(&self.config);

        let response = client
            .get_authorization_token()
            .domain(domain)
            .domain_owner(domain_owner)
            .send()
            .await
            .map_err(|e| {
                PartifactError::AuthFailure(format!(
                    "failed to get authorization token for {}/{}: {}",
                    domain_owner,
                    domain,
                    aws_sdk_codeartifact::error::DisplayErrorContext(e)
                ))
            })?;

        let token = response.authorization_token().ok_or_else(|| {
            PartifactError::AuthFailure(format!(
                "CodeArtifact returned no token for {}/{}",
                domain_owner, domain
            ))
        })?;

        Ok(AuthorizationToken::new(
            token,
            response
                .expiration()
                .and_then(|d| to_chrono(d.secs(), d.subsec_nanos())),
        ))
    }
}
