//! Turns raw configuration records into validated repository descriptors.
//!
//! A record is either an explicit key-value table or a single repository
//! URL of the form
//!
//! ```text
//! https://{domain}-{account}.d.codeartifact.{region}.amazonaws.com/pypi/{repo}[/simple][/]
//! ```
//!
//! URLs are parsed in two steps. [`parse_template`] splits the URL
//! positionally, taking the first dash of the host as the boundary between
//! domain and account. Domain names may themselves contain dashes, in which
//! case that split leaks part of the domain into the account. When the
//! account comes back non-numeric, [`disambiguate`] re-derives both fields
//! with a pattern that takes the rightmost run of digits before
//! `.d.codeartifact.` as the account.

use crate::{PartifactError, RepositoryDescriptor, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;
use url::Url;

/// The URL shape accepted by [`parse_repository_url`].
pub const URL_TEMPLATE: &str =
    "https://{domain}-{account}.d.codeartifact.{region}.amazonaws.com/pypi/{repo}[/simple][/]";

const HOST_SEPARATOR: &str = ".d.codeartifact.";
const HOST_SUFFIX: &str = ".amazonaws.com";
const PATH_PREFIX: &str = "/pypi/";

static DOMAIN_ACCOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<domain>.+)-(?P<account>\d+)\.d\.codeartifact\.")
        .expect("domain/account pattern is valid")
});

/// Mandatory fields of a table record, in reporting order.
pub const MANDATORY_FIELDS: [&str; 4] = [
    "code_artifact_domain",
    "aws_account",
    "aws_region",
    "code_artifact_repository",
];

/// A raw configuration record as found in the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigRecord {
    /// Explicit key-value table.
    Table(RecordTable),
    /// Repository URL, e.g. a Poetry source `url`.
    Url(String),
}

/// Key-value form of a repository record.
///
/// Every field is optional at this stage so that all missing mandatory
/// fields can be reported together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecordTable {
    #[serde(default, alias = "domain")]
    pub code_artifact_domain: Option<String>,

    /// Accepts a TOML string or integer.
    #[serde(
        default,
        alias = "code_artifact_account",
        alias = "account",
        deserialize_with = "string_or_integer"
    )]
    pub aws_account: Option<String>,

    #[serde(default, alias = "region")]
    pub aws_region: Option<String>,

    #[serde(default, alias = "repository")]
    pub code_artifact_repository: Option<String>,

    #[serde(default, alias = "profile")]
    pub aws_profile: Option<String>,

    /// Role name, or a full role ARN.
    #[serde(default, alias = "role_name", alias = "aws_role_arn")]
    pub aws_role_name: Option<String>,

    /// Repository URL; when present it supplies the mandatory fields.
    #[serde(default, alias = "index_url")]
    pub url: Option<String>,
}

impl RecordTable {
    /// Returns the mandatory fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [
            &self.code_artifact_domain,
            &self.aws_account,
            &self.aws_region,
            &self.code_artifact_repository,
        ];

        MANDATORY_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| *name)
            .collect()
    }
}

fn string_or_integer<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Account {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Account>::deserialize(deserializer)?.map(|account| match account {
        Account::Text(text) => text,
        Account::Number(number) => number.to_string(),
    }))
}

/// Positional components of a repository URL, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlComponents {
    pub host: String,
    pub domain: String,
    pub account: String,
    pub region: String,
    pub repository: String,
}

impl UrlComponents {
    fn account_is_numeric(&self) -> bool {
        !self.account.is_empty() && self.account.chars().all(|c| c.is_ascii_digit())
    }
}

/// Parses a record into a descriptor.
///
/// `repository` is the name the record was looked up by; it only appears
/// in error messages.
///
/// # Errors
///
/// - [`PartifactError::IncompleteConfig`] if a table record lacks mandatory
///   fields (all of them are listed)
/// - [`PartifactError::InvalidFormat`] if a URL does not match
///   [`URL_TEMPLATE`] or a field value is malformed
pub fn parse_record(record: ConfigRecord, repository: &str) -> Result<RepositoryDescriptor> {
    match record {
        ConfigRecord::Url(url) => parse_repository_url(&url),
        ConfigRecord::Table(table) => parse_table(table, repository),
    }
}

fn parse_table(table: RecordTable, repository: &str) -> Result<RepositoryDescriptor> {
    let descriptor = match table.url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => parse_repository_url(url)?,
        None => {
            let missing = table.missing_fields();
            if !missing.is_empty() {
                return Err(PartifactError::IncompleteConfig {
                    repository: repository.to_string(),
                    missing: missing.into_iter().map(String::from).collect(),
                });
            }

            RepositoryDescriptor::new(
                table.code_artifact_domain.unwrap_or_default(),
                table.aws_account.unwrap_or_default(),
                table.aws_region.unwrap_or_default(),
                table.code_artifact_repository.unwrap_or_default(),
            )?
        }
    };

    Ok(descriptor
        .with_profile(table.aws_profile.filter(|p| !p.is_empty()))
        .with_role_name(table.aws_role_name.filter(|r| !r.is_empty())))
}

/// Parses a CodeArtifact PyPI repository URL.
///
/// Trailing `/simple`, `/simple/` and `/` are stripped from the repository
/// name. Basic-auth credentials embedded in the URL are ignored; ports,
/// query strings and fragments are rejected.
///
/// # Example
///
/// ```
/// use partifact::parser::parse_repository_url;
///
/// let descriptor = parse_repository_url(
///     "https://test-domain-123456789.d.codeartifact.eu-west-1.amazonaws.com/pypi/test_ca_repo/simple/",
/// )?;
///
/// assert_eq!(descriptor.artifact_domain(), "test-domain");
/// assert_eq!(descriptor.account_id(), "123456789");
/// assert_eq!(descriptor.region(), "eu-west-1");
/// assert_eq!(descriptor.repository_name(), "test_ca_repo");
/// # Ok::<(), partifact::PartifactError>(())
/// ```
pub fn parse_repository_url(raw: &str) -> Result<RepositoryDescriptor> {
    let naive = parse_template(raw)?;

    let components = if naive.account_is_numeric() {
        naive
    } else {
        disambiguate(&naive).ok_or_else(|| {
            invalid(raw, format!("account id '{}' is not numeric", naive.account))
        })?
    };

    RepositoryDescriptor::new(
        components.domain,
        components.account,
        components.region,
        components.repository,
    )
    .map_err(|err| match err {
        PartifactError::InvalidFormat { message, .. } => invalid(raw, message),
        other => other,
    })
}

/// Splits a repository URL positionally.
///
/// The domain ends at the first dash of the host, so the account may come
/// back non-numeric for domains that contain dashes.
pub fn parse_template(raw: &str) -> Result<UrlComponents> {
    let url = Url::parse(raw.trim()).map_err(|e| invalid(raw, format!("not a URL ({})", e)))?;

    if url.scheme() != "https" {
        return Err(invalid(raw, format!("scheme '{}' is not https", url.scheme())));
    }

    if let Some(port) = url.port() {
        return Err(invalid(raw, format!("unexpected port {}", port)));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(raw, "query strings and fragments are not allowed"));
    }

    let host = url
        .host_str()
        .ok_or_else(|| invalid(raw, "missing host"))?;

    let (domain_and_account, region_and_suffix) = host
        .split_once(HOST_SEPARATOR)
        .ok_or_else(|| invalid(raw, format!("host does not contain '{}'", HOST_SEPARATOR)))?;

    let region = region_and_suffix
        .strip_suffix(HOST_SUFFIX)
        .filter(|region| !region.is_empty() && !region.contains('.'))
        .ok_or_else(|| invalid(raw, format!("host does not end with '<region>{}'", HOST_SUFFIX)))?;

    let (domain, account) = domain_and_account
        .split_once('-')
        .filter(|(domain, account)| !domain.is_empty() && !account.is_empty())
        .ok_or_else(|| invalid(raw, "host does not start with '<domain>-<account>'"))?;

    let repository = repository_from_path(url.path()).ok_or_else(|| {
        invalid(raw, format!("path is not '{}<repo>[/simple][/]'", PATH_PREFIX))
    })?;

    Ok(UrlComponents {
        host: host.to_string(),
        domain: domain.to_string(),
        account: account.to_string(),
        region: region.to_string(),
        repository: repository.to_string(),
    })
}

/// Re-derives domain and account from the host, taking the rightmost run
/// of digits before `.d.codeartifact.` as the account.
///
/// Returns `None` when the host has no such digit run.
pub fn disambiguate(naive: &UrlComponents) -> Option<UrlComponents> {
    let captures = DOMAIN_ACCOUNT_RE.captures(&naive.host)?;

    Some(UrlComponents {
        domain: captures["domain"].to_string(),
        account: captures["account"].to_string(),
        ..naive.clone()
    })
}

fn repository_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(PATH_PREFIX)?.trim_end_matches('/');
    let repository = rest
        .strip_suffix("/simple")
        .unwrap_or(rest)
        .trim_end_matches('/');

    if repository.is_empty() || repository.contains('/') {
        return None;
    }
    Some(repository)
}

fn invalid(raw: &str, message: impl Into<String>) -> PartifactError {
    PartifactError::invalid_format(format!("'{}': {}", raw, message.into()), URL_TEMPLATE)
}
