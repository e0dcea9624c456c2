//! The annotation row model of `phenotype.hpoa`
//!
//! Every row links one disease to one HPO term, together with the evidence,
//! the citation and optional onset, frequency, sex and modifier information.
//!
//! ```text
//! database_id  disease_name                                qualifier  hpo_id      reference      evidence  onset  frequency  sex  modifier  aspect  biocuration
//! OMIM:619340  Developmental and epileptic encephalopathy 96           HP:0011097  PMID:31675180  PCS              1/2                  P       HPO:probinson[2021-06-21]
//! OMIM:609153  Pseudohyperkalemia                          NOT        HP:0001878  PMID:2766660   PCS                                   P       HPO:lccarmody[2018-10-03]
//! ```
//!
//! Rows are validated while parsing. A row that does not match the schema
//! is reported as a [`RowError`] and skipped by the callers.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::term::TermId;

mod biocuration;
mod fields;
mod frequency;

pub use biocuration::{Biocuration, CurationEntry};
pub use fields::{Aspect, Evidence, Qualifier, Sex};
pub use frequency::Frequency;

/// Names of all columns of `phenotype.hpoa`, in the order of the release files
pub const COLUMNS: [&str; 12] = [
    "database_id",
    "disease_name",
    "qualifier",
    "hpo_id",
    "reference",
    "evidence",
    "onset",
    "frequency",
    "sex",
    "modifier",
    "aspect",
    "biocuration",
];

/// The raw text of all columns of one row, ordered as [`COLUMNS`]
pub type RawRow<'a> = [&'a str; 12];

/// Reasons why a single annotation row is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    /// A required column is empty
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    /// A column does not contain a valid identifier
    #[error("field `{0}` contains an invalid identifier: {1}")]
    InvalidId(&'static str, String),
    /// A column contains a value outside its allowed set
    #[error("field `{0}` contains an invalid value: {1}")]
    InvalidValue(&'static str, String),
    /// The frequency is neither an HPO term, a fraction nor a percentage
    #[error("invalid frequency: {0}")]
    InvalidFrequency(String),
    /// The biocuration entries are not formatted as `curator[YYYY-MM-DD]`
    #[error("invalid biocuration: {0}")]
    InvalidBiocuration(String),
}

/// A single validated disease-phenotype annotation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRow {
    database_id: TermId,
    disease_name: String,
    qualifier: Qualifier,
    hpo_id: TermId,
    reference: String,
    evidence: Evidence,
    onset: Option<TermId>,
    frequency: Option<Frequency>,
    sex: Sex,
    modifier: Vec<TermId>,
    aspect: Aspect,
    biocuration: Biocuration,
}

impl AnnotationRow {
    /// Validates the raw columns of one row
    ///
    /// # Errors
    ///
    /// Returns the first [`RowError`] found, checking the columns left to right
    ///
    /// # Examples
    ///
    /// ```
    /// use hpoa::annotations::{AnnotationRow, Evidence};
    ///
    /// let row = AnnotationRow::from_columns(&[
    ///     "OMIM:619340", "Developmental and epileptic encephalopathy 96", "",
    ///     "HP:0011097", "PMID:31675180", "PCS", "", "1/2", "", "", "P",
    ///     "HPO:probinson[2021-06-21]",
    /// ]).unwrap();
    ///
    /// assert_eq!(row.hpo_id().to_string(), "HP:0011097");
    /// assert_eq!(row.evidence(), Evidence::PCS);
    /// ```
    pub fn from_columns(cols: &RawRow<'_>) -> Result<AnnotationRow, RowError> {
        let [database_id, disease_name, qualifier, hpo_id, reference, evidence, onset, frequency, sex, modifier, aspect, biocuration] =
            (*cols).map(str::trim);

        let database_id = required_id("database_id", database_id)?;
        if disease_name.is_empty() {
            return Err(RowError::MissingField("disease_name"));
        }
        let qualifier = qualifier.parse()?;
        let hpo_id = hpo_term("hpo_id", hpo_id)?;
        if reference.is_empty() {
            return Err(RowError::MissingField("reference"));
        }
        let evidence = evidence.parse()?;
        let onset = match onset {
            "" => None,
            id => Some(hpo_term("onset", id)?),
        };
        let frequency = match frequency {
            "" => None,
            freq => Some(freq.parse()?),
        };
        let sex = sex.parse()?;
        let modifier = modifier
            .split(';')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| hpo_term("modifier", id))
            .collect::<Result<Vec<TermId>, RowError>>()?;
        let aspect = aspect.parse()?;
        let biocuration = biocuration.parse()?;

        Ok(AnnotationRow {
            database_id,
            disease_name: disease_name.to_string(),
            qualifier,
            hpo_id,
            reference: reference.to_string(),
            evidence,
            onset,
            frequency,
            sex,
            modifier,
            aspect,
            biocuration,
        })
    }

    /// Renders the row into the canonical text of its 12 columns, ordered as [`COLUMNS`]
    ///
    /// Prefixes are upper-cased and frequencies normalized, so `omim:1` becomes `OMIM:1`.
    pub fn columns(&self) -> [String; 12] {
        let modifier: Vec<&str> = self.modifier.iter().map(TermId::as_str).collect();
        [
            self.database_id.to_string(),
            self.disease_name.clone(),
            self.qualifier.to_string(),
            self.hpo_id.to_string(),
            self.reference.clone(),
            self.evidence.to_string(),
            self.onset.as_ref().map(ToString::to_string).unwrap_or_default(),
            self.frequency
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            self.sex.to_string(),
            modifier.join(";"),
            self.aspect.to_string(),
            self.biocuration.to_string(),
        ]
    }

    /// The CURIE of the disease, e.g. `OMIM:301500`
    pub fn database_id(&self) -> &TermId {
        &self.database_id
    }

    /// The accepted name of the disease
    pub fn disease_name(&self) -> &str {
        &self.disease_name
    }

    /// Whether the phenotype is asserted or excluded
    pub fn qualifier(&self) -> Qualifier {
        self.qualifier
    }

    /// Returns `true` if the phenotype is explicitly excluded for the disease
    pub fn is_negated(&self) -> bool {
        self.qualifier == Qualifier::Not
    }

    /// The annotated HPO term
    pub fn hpo_id(&self) -> &TermId {
        &self.hpo_id
    }

    /// The raw citation column, might list several references
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Iterates the individual references of the citation column
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.reference
            .split(';')
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// The evidence code
    pub fn evidence(&self) -> Evidence {
        self.evidence
    }

    /// The onset of the phenotype, a term below `HP:0003674 | Onset`
    pub fn onset(&self) -> Option<&TermId> {
        self.onset.as_ref()
    }

    /// How often the phenotype is present in patients
    pub fn frequency(&self) -> Option<&Frequency> {
        self.frequency.as_ref()
    }

    /// The phenotypic sex the annotation is limited to
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Clinical modifier terms
    pub fn modifier(&self) -> &[TermId] {
        &self.modifier
    }

    /// The sub-ontology of the annotated term
    pub fn aspect(&self) -> Aspect {
        self.aspect
    }

    /// The curation history
    pub fn biocuration(&self) -> &Biocuration {
        &self.biocuration
    }

    /// The creation record of the annotation
    pub fn created(&self) -> &CurationEntry {
        self.biocuration.created()
    }
}

impl Display for AnnotationRow {
    /// Formats the row as one tab-delimited line of `phenotype.hpoa`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.columns().join("\t"))
    }
}

fn required_id(field: &'static str, value: &str) -> Result<TermId, RowError> {
    if value.is_empty() {
        return Err(RowError::MissingField(field));
    }
    TermId::try_from(value).map_err(|_| RowError::InvalidId(field, value.to_string()))
}

fn hpo_term(field: &'static str, value: &str) -> Result<TermId, RowError> {
    let id = required_id(field, value)?;
    if id.is_hpo() {
        Ok(id)
    } else {
        Err(RowError::InvalidId(field, value.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const VALID: RawRow<'static> = [
        "OMIM:619340",
        "Developmental and epileptic encephalopathy 96",
        "",
        "HP:0011097",
        "PMID:31675180",
        "PCS",
        "HP:0003593",
        "1/2",
        "FEMALE",
        "HP:0012828;HP:0003680",
        "P",
        "HPO:probinson[2021-06-21];HPO:skoehler[2022-01-02]",
    ];

    fn with(idx: usize, value: &'static str) -> RawRow<'static> {
        let mut cols = VALID;
        cols[idx] = value;
        cols
    }

    #[test]
    fn valid_row() {
        let row = AnnotationRow::from_columns(&VALID).unwrap();
        assert_eq!(row.database_id(), &"OMIM:619340");
        assert_eq!(row.qualifier(), Qualifier::Asserted);
        assert!(!row.is_negated());
        assert_eq!(row.onset().unwrap(), &"HP:0003593");
        assert_eq!(row.sex(), Sex::Female);
        assert_eq!(row.modifier().len(), 2);
        assert_eq!(row.aspect(), Aspect::P);
        assert_eq!(row.created().curator(), "HPO:probinson");
    }

    #[test]
    fn columns_render_back() {
        let row = AnnotationRow::from_columns(&VALID).unwrap();
        assert_eq!(row.columns(), VALID.map(String::from));
        assert_eq!(row.to_string(), VALID.join("\t"));
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let mut cols = VALID;
        cols[6] = "";
        cols[7] = "";
        cols[8] = "";
        cols[9] = "";
        let row = AnnotationRow::from_columns(&cols).unwrap();
        assert!(row.onset().is_none());
        assert!(row.frequency().is_none());
        assert_eq!(row.sex(), Sex::Unspecified);
        assert!(row.modifier().is_empty());
    }

    #[test]
    fn negated_row() {
        let row = AnnotationRow::from_columns(&with(2, "NOT")).unwrap();
        assert!(row.is_negated());
    }

    #[test]
    fn multiple_references() {
        let row = AnnotationRow::from_columns(&with(4, "PMID:1;PMID:2; OMIM:3")).unwrap();
        let refs: Vec<&str> = row.references().collect();
        assert_eq!(refs, vec!["PMID:1", "PMID:2", "OMIM:3"]);
    }

    #[test]
    fn invalid_rows() {
        assert_eq!(
            AnnotationRow::from_columns(&with(0, "")),
            Err(RowError::MissingField("database_id"))
        );
        assert_eq!(
            AnnotationRow::from_columns(&with(1, " ")),
            Err(RowError::MissingField("disease_name"))
        );
        assert!(AnnotationRow::from_columns(&with(2, "MAYBE")).is_err());
        assert_eq!(
            AnnotationRow::from_columns(&with(3, "MONDO:0000001")),
            Err(RowError::InvalidId("hpo_id", "MONDO:0000001".to_string()))
        );
        assert!(AnnotationRow::from_columns(&with(4, "")).is_err());
        assert!(AnnotationRow::from_columns(&with(5, "XYZ")).is_err());
        assert!(AnnotationRow::from_columns(&with(6, "early")).is_err());
        assert!(AnnotationRow::from_columns(&with(7, "1/2;50%")).is_err());
        assert!(AnnotationRow::from_columns(&with(8, "OTHER")).is_err());
        assert!(AnnotationRow::from_columns(&with(9, "HP:0012828;foo")).is_err());
        assert!(AnnotationRow::from_columns(&with(10, "")).is_err());
        assert!(AnnotationRow::from_columns(&with(11, "nobody")).is_err());
    }

    #[test]
    fn json_handoff() {
        let row = AnnotationRow::from_columns(&VALID).unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["database_id"], "OMIM:619340");
        assert_eq!(json["qualifier"], "");
        assert_eq!(json["frequency"], "1/2");
        assert_eq!(
            json["biocuration"],
            "HPO:probinson[2021-06-21];HPO:skoehler[2022-01-02]"
        );

        let back: AnnotationRow = serde_json::from_value(json).unwrap();
        assert_eq!(back, row);
    }
}
