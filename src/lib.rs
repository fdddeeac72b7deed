//! Partifact - log pip and Poetry into AWS CodeArtifact.
//!
//! Partifact resolves a CodeArtifact PyPI repository from `pyproject.toml`,
//! exchanges local AWS credentials (optionally through an assumed role) for
//! a short-lived authorization token, and writes that token into the pip
//! and Poetry configuration.
//!
//! # Pipeline
//!
//! 1. [`ConfigResolver::load`] finds the repository record and turns it
//!    into a [`RepositoryDescriptor`] (see [`parser`] for the URL rules)
//! 2. [`acquire_token`] opens a credential session, assumes a role if one
//!    is configured, and requests a token
//! 3. [`configure::apply`] runs `pip config` and `poetry config`
//!
//! # Quick Start
//!
//! ```no_run
//! use partifact::configure::Targets;
//! use partifact::login::{login, LoginOptions};
//! use partifact::providers::aws::AwsProvider;
//! use partifact::shell::SystemRunner;
//! use partifact::ConfigResolver;
//!
//! #[tokio::main]
//! async fn main() -> partifact::Result<()> {
//!     let options = LoginOptions::new("private")
//!         .with_profile(Some("dev".to_string()))
//!         .with_targets(Targets { pip: true, poetry: true });
//!
//!     let outcome = login(
//!         &ConfigResolver::default(),
//!         &AwsProvider::new(),
//!         &SystemRunner,
//!         &options,
//!     )
//!     .await?;
//!
//!     println!("logged into {}", outcome.descriptor.index_url());
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Purpose |
//! |---------|---------|---------|
//! | `aws` | yes | AWS SDK credential provider, required by the binary |
//! | `mock` | yes | In-memory provider and recording command runner for tests |

pub mod config;
pub mod configure;
pub mod descriptor;
pub mod error;
pub mod login;
pub mod parser;
pub mod providers;
pub mod session;
pub mod shell;
pub mod token;
pub mod validation;

pub use config::ConfigResolver;
pub use descriptor::RepositoryDescriptor;
pub use error::{PartifactError, Result};
pub use session::{AuthorizationToken, CredentialProvider, Session};
pub use token::acquire_token;
