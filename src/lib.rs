//! Indexed lookup of HPO disease-phenotype annotations (`phenotype.hpoa`)
//! and categorization of phenotype and disease terms via their ontology ancestors.
//!
//! The crate has three main parts:
//!
//! - [`AnnotationStore`]: loads `phenotype.hpoa` into an indexed SQLite table and answers
//!   lookups by disease, citation and phenotype
//! - [`Categorizer`]: buckets a term into the top-level categories below a root term,
//!   e.g. the organ systems below `HP:0000118 | Phenotypic abnormality`
//! - [`OntologyAccess`]: the interface both of the above use to reach an ontology.
//!   [`Ontology`] implements it on top of an OBO file (`hp.obo`, `mondo.obo`)
//!
//! # Examples
//!
//! ```no_run
//! use hpoa::{AnnotationStore, StoreConfig};
//!
//! let store = AnnotationStore::open(StoreConfig::from_env()).unwrap();
//! store.ensure_loaded().unwrap();
//!
//! for row in store.filter_by_disease("OMIM:301500").unwrap() {
//!     println!("{}\t{}", row.hpo_id(), row.reference());
//! }
//! ```
use thiserror::Error;

pub mod annotations;
pub mod category;
pub mod config;
pub mod lookup;
pub mod ontology;
pub mod parser;
pub mod store;
pub mod term;

pub use annotations::AnnotationRow;
pub use category::{Categorizer, Category, CategoryCache};
pub use config::StoreConfig;
pub use ontology::{Ontology, OntologyAccess};
pub use store::{AnnotationStore, LoadSummary};
pub use term::{TermGroup, TermId};

/// `HP:0000001 | All`
pub const HPO_ROOT: &str = "HP:0000001";
/// `HP:0000118 | Phenotypic abnormality`, parent of the organ-system categories
pub const PHENOTYPIC_ABNORMALITY: &str = "HP:0000118";
/// `MONDO:0700096 | human disease`, parent of the disease categories
pub const HUMAN_DISEASE: &str = "MONDO:0700096";

/// Canonical filename of the annotation dataset, also used to pick the
/// download asset from a release
pub const DATASET_FILENAME: &str = "phenotype.hpoa";

const DEFAULT_NUM_PARENTS: usize = 10;
const DEFAULT_NUM_ALL_PARENTS: usize = 30;

/// Main error type of the `hpoa` crate
///
/// Errors of individual annotation rows are not part of this enum,
/// see [`annotations::RowError`].
#[derive(Error, Debug)]
pub enum HpoaError {
    /// None of the dataset sources could provide `phenotype.hpoa`
    #[error("annotation dataset is not available from any source")]
    DataUnavailable,
    /// The dataset header is missing or a line does not match the header
    #[error("unable to parse annotation dataset: {0}")]
    ParseError(String),
    /// A file could not be opened or read
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// Input data is malformed
    #[error("invalid input data: {0}")]
    InvalidInput(String),
    /// The remote release could not be downloaded
    #[error("download failed: {0}")]
    Download(String),
    /// The backing database failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Generic IO error while writing the cache
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for HpoaError {
    fn from(err: reqwest::Error) -> Self {
        HpoaError::Download(err.to_string())
    }
}

/// Shortcut for `Result<T, HpoaError>`
pub type HpoaResult<T> = Result<T, HpoaError>;
