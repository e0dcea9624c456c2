use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotations::RowError;
use crate::term::TermId;

/// How often a phenotype is observed in patients with the disease
///
/// The column allows exactly one of three notations, never a combination:
///
/// ```text
/// HP:0040283    term of the `Frequency` sub-ontology
/// 7/13          7 of 13 patients were affected
/// 17%           percentage of affected patients
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// A term below `HP:0040279 | Frequency`
    Term(TermId),
    /// Number of affected patients within a cohort
    Fraction { affected: u32, total: u32 },
    /// Percentage of affected patients
    Percentage(f32),
}

impl Frequency {
    /// Returns the frequency as a ratio between 0 and 1
    ///
    /// Returns `None` for [`Frequency::Term`], because resolving the term
    /// requires the ontology.
    pub fn ratio(&self) -> Option<f32> {
        match self {
            Frequency::Term(_) => None,
            Frequency::Fraction { affected, total } => Some(*affected as f32 / *total as f32),
            Frequency::Percentage(pct) => Some(pct / 100.0),
        }
    }
}

impl FromStr for Frequency {
    type Err = RowError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RowError::InvalidFrequency(s.to_string());

        if let Some(pct) = s.strip_suffix('%') {
            let pct: f32 = pct.trim().parse().map_err(|_| invalid())?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(invalid());
            }
            return Ok(Frequency::Percentage(pct));
        }

        if let Some((affected, total)) = s.split_once('/') {
            let affected: u32 = affected.trim().parse().map_err(|_| invalid())?;
            let total: u32 = total.trim().parse().map_err(|_| invalid())?;
            if total == 0 || affected > total {
                return Err(invalid());
            }
            return Ok(Frequency::Fraction { affected, total });
        }

        match TermId::try_from(s) {
            Ok(id) if id.is_hpo() => Ok(Frequency::Term(id)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = RowError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.to_string()
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Term(id) => write!(f, "{id}"),
            Frequency::Fraction { affected, total } => write!(f, "{affected}/{total}"),
            Frequency::Percentage(pct) => write!(f, "{pct}%"),
        }
    }
}
