//! # Hostname Model
//!
//! Two value types live here:
//! * [`TargetDomain`]: the apex domain a run enumerates (e.g. `example.com`).
//! * [`Hostname`]: a normalized name strictly below a [`TargetDomain`].
//!
//! Both are normalized the same way: surrounding whitespace and dots are
//! stripped and the name is lowercased. A [`Hostname`] can only be built through
//! [`Hostname::parse`], which checks containment in the target's subtree, so any
//! value of that type is known to belong to the run.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostnameError {
    #[error("empty name")]
    Empty,
    #[error("name is {0} characters long, the limit is 253")]
    TooLong(usize),
    #[error("invalid label '{label}' in '{name}'")]
    InvalidLabel { name: String, label: String },
    #[error("'{host}' is not a subdomain of '{domain}'")]
    OutsideDomain { host: String, domain: String },
}

/// The apex domain under enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetDomain {
    name: String,
    suffix: String,
}

impl TargetDomain {
    pub fn new(raw: &str) -> Result<Self, HostnameError> {
        let name: String = normalize(raw);
        validate_syntax(&name)?;
        let suffix: String = format!(".{name}");
        Ok(Self { name, suffix })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// The domain prefixed with a dot, e.g. `.example.com`.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Builds `<label>.<domain>` without validating the label.
    pub fn join(&self, label: &str) -> String {
        format!("{label}{}", self.suffix)
    }

    /// Returns true if `name` lies strictly below this domain.
    pub fn contains(&self, name: &str) -> bool {
        name.len() > self.suffix.len() && name.ends_with(&self.suffix)
    }
}

impl FromStr for TargetDomain {
    type Err = HostnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TargetDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A normalized hostname that belongs to the target domain's subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hostname(String);

impl Hostname {
    /// Normalizes `raw` and checks that it is a valid name strictly below `domain`.
    pub fn parse(raw: &str, domain: &TargetDomain) -> Result<Self, HostnameError> {
        let name: String = normalize(raw);
        validate_syntax(&name)?;
        if !domain.contains(&name) {
            return Err(HostnameError::OutsideDomain {
                host: name,
                domain: domain.as_str().to_string(),
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The labels in front of the target domain, e.g. `api.dev` for `api.dev.example.com`.
    pub fn relative_to<'a>(&'a self, domain: &TargetDomain) -> &'a str {
        self.0
            .strip_suffix(domain.suffix())
            .unwrap_or(self.0.as_str())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trims whitespace and surrounding dots and lowercases the name.
pub fn normalize(raw: &str) -> String {
    raw.trim().trim_matches('.').to_ascii_lowercase()
}

fn validate_syntax(name: &str) -> Result<(), HostnameError> {
    if name.is_empty() {
        return Err(HostnameError::Empty);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(HostnameError::TooLong(name.len()));
    }

    for label in name.split('.') {
        if !is_valid_label(label) {
            return Err(HostnameError::InvalidLabel {
                name: name.to_string(),
                label: label.to_string(),
            });
        }
    }
    Ok(())
}

// Underscores are accepted: service labels like `_dmarc` show up in passive data.
fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
