//! Configuration resolution.
//!
//! Repository records are read from `pyproject.toml`. Two storage shapes
//! are recognised, checked in this order:
//!
//! ```toml
//! # 1. A dedicated table keyed by repository name
//! [tool.partifact.repository.private]
//! code_artifact_domain = "acme"
//! aws_account = "123456789012"
//! aws_region = "eu-west-1"
//! code_artifact_repository = "pypi-store"
//! aws_profile = "dev"            # optional
//! aws_role_name = "pypi-reader"  # optional
//!
//! # 2. A Poetry source whose url points at CodeArtifact
//! [[tool.poetry.source]]
//! name = "private"
//! url = "https://acme-123456789012.d.codeartifact.eu-west-1.amazonaws.com/pypi/pypi-store/simple/"
//! ```

use crate::parser::{parse_record, ConfigRecord, RecordTable};
use crate::{PartifactError, RepositoryDescriptor, Result};
use log::debug;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Default configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "./pyproject.toml";

/// Locates repository records in a configuration file and resolves them
/// into descriptors.
///
/// # Example
///
/// ```no_run
/// use partifact::ConfigResolver;
///
/// let descriptor = ConfigResolver::default().load("private", None, Some("admin".to_string()))?;
/// assert_eq!(descriptor.role_name(), Some("admin"));
/// # Ok::<(), partifact::PartifactError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    path: PathBuf,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(CONFIG_PATH)
    }
}

impl ConfigResolver {
    /// Creates a resolver reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves the descriptor for `repository`.
    ///
    /// `profile_override` and `role_override` replace whatever the record
    /// specifies when they are `Some`.
    ///
    /// # Errors
    ///
    /// - [`PartifactError::ConfigNotFound`] if the file is missing, is not
    ///   valid TOML, or has no record for `repository`
    /// - [`PartifactError::IncompleteConfig`] if mandatory fields are missing
    /// - [`PartifactError::InvalidFormat`] if a URL or field value is malformed
    pub fn load(
        &self,
        repository: &str,
        profile_override: Option<String>,
        role_override: Option<String>,
    ) -> Result<RepositoryDescriptor> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PartifactError::ConfigNotFound(format!(
                    "no configuration file found at {}",
                    self.path.display()
                )));
            }
            Err(e) => {
                return Err(PartifactError::ConfigNotFound(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let document: Table = toml::from_str(&contents).map_err(|e| {
            PartifactError::ConfigNotFound(format!("invalid {}: {}", self.path.display(), e))
        })?;

        let record = find_record(&document, repository)?.ok_or_else(|| {
            PartifactError::ConfigNotFound(format!(
                "no configuration found for {} in {}",
                repository,
                self.path.display()
            ))
        })?;

        let descriptor = parse_record(record, repository)?;
        let profile = profile_override.or_else(|| descriptor.profile().map(String::from));
        let role_name = role_override.or_else(|| descriptor.role_name().map(String::from));

        Ok(descriptor.with_profile(profile).with_role_name(role_name))
    }
}

/// Finds the raw record for `repository`, trying the dedicated table first
/// and then Poetry sources (first match by name).
fn find_record(document: &Table, repository: &str) -> Result<Option<ConfigRecord>> {
    let tool = document.get("tool");

    if let Some(value) = tool
        .and_then(|t| t.get("partifact"))
        .and_then(|p| p.get("repository"))
        .and_then(|r| r.get(repository))
    {
        debug!("found [tool.partifact.repository.{}]", repository);
        let table: RecordTable = value.clone().try_into().map_err(|e| {
            PartifactError::invalid_format(
                format!("invalid record for {}: {}", repository, e),
                "string values for every repository field",
            )
        })?;
        return Ok(Some(ConfigRecord::Table(table)));
    }

    let sources = tool
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("source"))
        .and_then(Value::as_array);

    let Some(source) = sources
        .into_iter()
        .flatten()
        .find(|source| source.get("name").and_then(Value::as_str) == Some(repository))
    else {
        return Ok(None);
    };

    match source.get("url").and_then(Value::as_str) {
        Some(url) if !url.is_empty() => {
            debug!("found poetry source {} with url {}", repository, url);
            Ok(Some(ConfigRecord::Url(url.to_string())))
        }
        _ => Err(PartifactError::IncompleteConfig {
            repository: repository.to_string(),
            missing: vec!["url".to_string()],
        }),
    }
}
