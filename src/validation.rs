//! Input validation for descriptor fields and interpolated command arguments.

use crate::{PartifactError, Result};

/// Characters that must never reach a package-manager config key.
const DANGEROUS_CHARS: &str = ";|&$`<>(){}[]!*?~#%^\\\"'";

/// Maximum allowed length for repository names.
const MAX_NAME_LENGTH: usize = 255;

/// Validates that an account identifier is made of digits only.
///
/// # Example
///
/// ```
/// use partifact::validation::validate_account_id;
///
/// assert!(validate_account_id("123456789012").is_ok());
/// assert!(validate_account_id("domain-123").is_err());
/// assert!(validate_account_id("").is_err());
/// ```
pub fn validate_account_id(account: &str) -> Result<()> {
    if account.is_empty() || !account.chars().all(|c| c.is_ascii_digit()) {
        return Err(PartifactError::invalid_format(
            format!("account id '{}' is not numeric", account),
            "a digits-only AWS account id",
        ));
    }
    Ok(())
}

/// Validates a region identifier.
///
/// Regions are lowercase alphanumeric with dashes and never start with a
/// digit, which is what lets the URL parser separate account from region.
pub fn validate_region(region: &str) -> Result<()> {
    let well_formed = region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let starts_with_letter = region.chars().next().is_some_and(|c| c.is_ascii_lowercase());

    if !well_formed || !starts_with_letter {
        return Err(PartifactError::invalid_format(
            format!("region '{}' is not a valid region identifier", region),
            "a lowercase region such as eu-west-1",
        ));
    }
    Ok(())
}

/// Validates a Poetry repository name before it is interpolated into
/// `http-basic.<name>`.
///
/// Rejects empty names, names longer than 255 characters, control
/// characters, whitespace, shell metacharacters and `.` (Poetry splits
/// config keys on dots).
///
/// # Example
///
/// ```
/// use partifact::validation::validate_repository_name;
///
/// assert!(validate_repository_name("my-private-repo").is_ok());
/// assert!(validate_repository_name("repo; rm -rf /").is_err());
/// assert!(validate_repository_name("repo.evil").is_err());
/// ```
pub fn validate_repository_name(name: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(PartifactError::invalid_format(
            format!("repository name '{}' {}", name.escape_default(), reason),
            "a repository name of letters, digits, '-' and '_'",
        ))
    };

    if name.is_empty() {
        return reject("is empty");
    }

    if name.len() > MAX_NAME_LENGTH {
        return reject("exceeds 255 characters");
    }

    if name.chars().any(|c| c.is_control()) {
        return reject("contains control characters");
    }

    if name.chars().any(char::is_whitespace) || name.contains('.') {
        return reject("contains whitespace or '.'");
    }

    if name.chars().any(|c| DANGEROUS_CHARS.contains(c)) {
        return reject("contains dangerous characters");
    }

    Ok(())
}
