use core::fmt::Debug;
use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{HpoaError, HpoaResult};

/// A validated compact identifier (CURIE) of an ontology term or a database record
///
/// The prefix is normalized to upper case, the local part is kept as is.
///
/// # Examples
///
/// ```
/// use hpoa::TermId;
///
/// let id = TermId::try_from("hp:0000118").unwrap();
/// assert_eq!(id.to_string(), "HP:0000118");
/// assert_eq!(id.prefix(), "HP");
/// assert_eq!(id.local(), "0000118");
/// assert!(id.is_hpo());
///
/// assert!(TermId::try_from("HP0000118").is_err());
/// ```
#[derive(Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TermId {
    inner: String,
    colon: usize,
}

impl TermId {
    /// The database or ontology prefix, e.g. `HP` or `OMIM`
    pub fn prefix(&self) -> &str {
        &self.inner[..self.colon]
    }

    /// The identifier within the prefix namespace, e.g. `0000118`
    pub fn local(&self) -> &str {
        &self.inner[self.colon + 1..]
    }

    /// Returns the full CURIE
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns `true` if the id has the shape of an HPO term: `HP:` followed by 7 digits
    pub fn is_hpo(&self) -> bool {
        self.prefix() == "HP"
            && self.local().len() == 7
            && self.local().bytes().all(|b| b.is_ascii_digit())
    }

    /// Returns `true` if the id belongs to the MONDO namespace
    pub fn is_mondo(&self) -> bool {
        self.prefix() == "MONDO"
    }
}

impl TryFrom<&str> for TermId {
    type Error = HpoaError;
    fn try_from(s: &str) -> HpoaResult<Self> {
        let s = s.trim();
        let Some((prefix, local)) = s.split_once(':') else {
            return Err(HpoaError::InvalidInput(format!("{s} is not a CURIE")));
        };
        let valid_prefix = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');
        if !valid_prefix || local.is_empty() || local.chars().any(char::is_whitespace) {
            return Err(HpoaError::InvalidInput(format!("{s} is not a CURIE")));
        }
        Ok(TermId {
            inner: format!("{}:{}", prefix.to_ascii_uppercase(), local),
            colon: prefix.len(),
        })
    }
}

impl TryFrom<String> for TermId {
    type Error = HpoaError;
    fn try_from(s: String) -> HpoaResult<Self> {
        TermId::try_from(s.as_str())
    }
}

impl From<TermId> for String {
    fn from(id: TermId) -> Self {
        id.inner
    }
}

impl Ord for TermId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}

impl PartialOrd for TermId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        TermId::try_from(other).map_or(false, |other| self == &other)
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}
