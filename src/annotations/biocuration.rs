use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::annotations::RowError;

/// A single curation record: who curated the annotation and when
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurationEntry {
    curator: String,
    date: NaiveDate,
}

impl CurationEntry {
    /// The curator, e.g. `HPO:probinson` or an ORCID
    pub fn curator(&self) -> &str {
        &self.curator
    }

    /// The date of the curation
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl FromStr for CurationEntry {
    type Err = RowError;
    /// Parses `<curator>[<YYYY-MM-DD>]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RowError::InvalidBiocuration(s.to_string());
        let Some((curator, date)) = s.trim().strip_suffix(']').and_then(|s| s.split_once('['))
        else {
            return Err(invalid());
        };
        if curator.is_empty() {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
        Ok(Self {
            curator: curator.to_string(),
            date,
        })
    }
}

impl Display for CurationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.curator, self.date.format("%Y-%m-%d"))
    }
}

/// The curation history of an annotation
///
/// ```text
/// HPO:probinson[2021-06-21];HPO:skoehler[2023-01-12]
/// ```
///
/// The first entry is the creation record, every following entry
/// a later revision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Biocuration {
    entries: Vec<CurationEntry>,
}

impl Biocuration {
    /// The creation record
    pub fn created(&self) -> &CurationEntry {
        // parsing guarantees at least one entry
        &self.entries[0]
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[CurationEntry] {
        &self.entries
    }
}

impl FromStr for Biocuration {
    type Err = RowError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entries = s
            .split(';')
            .filter(|entry| !entry.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<CurationEntry>, RowError>>()?;
        if entries.is_empty() {
            return Err(RowError::MissingField("biocuration"));
        }
        Ok(Self { entries })
    }
}

impl TryFrom<String> for Biocuration {
    type Error = RowError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Biocuration> for String {
    fn from(b: Biocuration) -> Self {
        b.to_string()
    }
}

impl Display for Biocuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, entry) in self.entries.iter().enumerate() {
            if idx > 0 {
                f.write_str(";")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_entry() {
        let b: Biocuration = "HPO:probinson[2021-06-21]".parse().unwrap();
        assert_eq!(b.entries().len(), 1);
        assert_eq!(b.created().curator(), "HPO:probinson");
        assert_eq!(
            b.created().date(),
            NaiveDate::from_ymd_opt(2021, 6, 21).unwrap()
        );
    }

    #[test]
    fn first_entry_is_creation() {
        let b: Biocuration = "HPO:joseph[2012-07-05];HPO:suzanna[2015-12-07]"
            .parse()
            .unwrap();
        assert_eq!(b.entries().len(), 2);
        assert_eq!(b.created().curator(), "HPO:joseph");
        assert_eq!(
            b.to_string(),
            "HPO:joseph[2012-07-05];HPO:suzanna[2015-12-07]"
        );
    }

    #[test]
    fn invalid_entries() {
        assert!("".parse::<Biocuration>().is_err());
        assert!("HPO:probinson".parse::<Biocuration>().is_err());
        assert!("HPO:probinson[2021-13-01]".parse::<Biocuration>().is_err());
        assert!("[2021-01-01]".parse::<Biocuration>().is_err());
        assert!("HPO:a[2021-01-01];HPO:b[01.01.2021]"
            .parse::<Biocuration>()
            .is_err());
    }
}
