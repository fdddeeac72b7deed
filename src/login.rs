//! The login pipeline: resolve the repository, acquire a token, configure
//! package managers.
//!
//! Each step completes before the next starts; the first failure ends the
//! run.

use crate::configure::{self, Targets};
use crate::session::{AuthorizationToken, CredentialProvider};
use crate::shell::CommandRunner;
use crate::{acquire_token, ConfigResolver, RepositoryDescriptor, Result};
use log::debug;

/// Inputs to one login run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginOptions {
    /// Repository name as used in the configuration file and by Poetry
    pub repository: String,
    /// Credential profile, overriding the configuration
    pub profile: Option<String>,
    /// Role to assume, overriding the configuration
    pub role: Option<String>,
    /// Package managers to configure
    pub targets: Targets,
}

impl LoginOptions {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Default::default()
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_role(mut self, role: Option<String>) -> Self {
        self.role = role;
        self
    }

    pub fn with_targets(mut self, targets: Targets) -> Self {
        self.targets = targets;
        self
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub descriptor: RepositoryDescriptor,
    pub token: AuthorizationToken,
}

/// Runs the full login pipeline.
///
/// # Errors
///
/// Any error from resolution, token acquisition or configuration, unchanged.
pub async fn login(
    resolver: &ConfigResolver,
    provider: &dyn CredentialProvider,
    runner: &dyn CommandRunner,
    options: &LoginOptions,
) -> Result<LoginOutcome> {
    debug!(
        "resolving {} from {}",
        options.repository,
        resolver.path().display()
    );
    let descriptor = resolver.load(
        &options.repository,
        options.profile.clone(),
        options.role.clone(),
    )?;

    let token = acquire_token(provider, &descriptor).await?;

    configure::apply(
        runner,
        &descriptor,
        &options.repository,
        token.token(),
        options.targets,
    )
    .await?;

    Ok(LoginOutcome { descriptor, token })
}
