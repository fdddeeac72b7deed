//! CodeArtifact token acquisition.

use crate::session::{AuthorizationToken, CredentialProvider, SessionRequest};
use crate::{RepositoryDescriptor, Result};
use log::debug;

/// Session name used when assuming a role.
pub const ROLE_SESSION_NAME: &str = "partifact-session";

/// Derives the ARN of the role to assume.
///
/// Values that are already ARNs are returned unchanged.
///
/// # Example
///
/// ```
/// use partifact::token::role_arn;
///
/// assert_eq!(role_arn("1234", "test-role"), "arn:aws:iam::1234:role/test-role");
/// assert_eq!(
///     role_arn("1234", "arn:aws:iam::999:role/other"),
///     "arn:aws:iam::999:role/other"
/// );
/// ```
pub fn role_arn(account_id: &str, role_name: &str) -> String {
    if role_name.starts_with("arn:") {
        role_name.to_string()
    } else {
        format!("arn:aws:iam::{}:role/{}", account_id, role_name)
    }
}

/// Obtains an authorization token for the repository's domain.
///
/// Opens a base session for the descriptor's profile and region. When the
/// descriptor names a role, the role is assumed and a second session is
/// opened with the temporary credentials, in the same region. The token is
/// requested from the last session opened.
///
/// # Errors
///
/// Returns [`PartifactError::AuthFailure`](crate::PartifactError::AuthFailure)
/// if any credential exchange fails.
pub async fn acquire_token(
    provider: &dyn CredentialProvider,
    descriptor: &RepositoryDescriptor,
) -> Result<AuthorizationToken> {
    debug!(
        "opening {} session (profile: {}, region: {})",
        provider.name(),
        descriptor.profile().unwrap_or("default"),
        descriptor.region()
    );
    let mut session = provider
        .open_session(SessionRequest::profile(
            descriptor.profile().map(String::from),
            descriptor.region(),
        ))
        .await?;

    if let Some(role_name) = descriptor.role_name() {
        let arn = role_arn(descriptor.account_id(), role_name);
        debug!("assuming role {}", arn);

        let credentials = session.assume_role(&arn, ROLE_SESSION_NAME).await?;
        session = provider
            .open_session(SessionRequest::temporary(credentials, descriptor.region()))
            .await?;
    }

    debug!(
        "requesting authorization token for domain {} owned by {}",
        descriptor.artifact_domain(),
        descriptor.account_id()
    );
    session
        .authorization_token(descriptor.artifact_domain(), descriptor.account_id())
        .await
}
