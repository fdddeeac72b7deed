//! AWS credential provider.
//!
//! Sessions are built with the official AWS SDK: `aws-config` resolves the
//! credential chain, `aws-sdk-sts` assumes roles and `aws-sdk-codeartifact`
//! issues authorization tokens.
//!
//! # Requirements
//!
//! - AWS credentials configured via:
//!   - Environment variables (`AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`)
//!   - Shared credentials/config files (`~/.aws/credentials`, `~/.aws/config`)
//!   - SSO or IAM instance role
//! - Permission to call `codeartifact:GetAuthorizationToken` and
//!   `sts:GetServiceBearerToken`, plus `sts:AssumeRole` when a role is used
//!
//! # Example
//!
//! ```no_run
//! use partifact::providers::aws::AwsProvider;
//! use partifact::{acquire_token, RepositoryDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> partifact::Result<()> {
//!     let descriptor = RepositoryDescriptor::new("my-domain", "123456789012", "eu-west-1", "pypi")?
//!         .with_profile(Some("dev".to_string()));
//!
//!     let token = acquire_token(&AwsProvider::new(), &descriptor).await?;
//!     println!("token valid until {:?}", token.expires_at());
//!     Ok(())
//! }
//! ```

mod provider;
mod session;

pub use provider::AwsProvider;
pub use session::AwsSession;
