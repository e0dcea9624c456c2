//! The indexed annotation table
//!
//! [`AnnotationStore`] keeps all rows of `phenotype.hpoa` in one SQLite table
//! and answers lookups by disease, citation and phenotype.
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params_from_iter, Connection};
use tracing::{debug, info, trace, warn};

use crate::annotations::{AnnotationRow, RawRow};
use crate::config::StoreConfig;
use crate::ontology::OntologyAccess;
use crate::parser::phenotype_hpoa::{self, ParsedDataset};
use crate::HpoaResult;

pub mod release;
mod schema;
pub mod source;

use source::DatasetSource;

static DISEASE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:OMIM|ORPHA|MONDO|DECIPHER):[A-Z0-9_.\-]+").expect("static regex is valid")
});

static HPO_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HP:\d{7}$").expect("static regex is valid"));

/// Outcome of the most recent successful load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of rows in the table
    pub rows: usize,
    /// Number of rows dropped during validation
    pub skipped: usize,
    /// Name of the [`DatasetSource`] that provided the dataset
    pub source: String,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Indexed lookup of `phenotype.hpoa` annotations
///
/// The store is safe to share between threads. Once loaded, lookups never wait
/// for a running load; a load replaces the whole table in one transaction, so a
/// lookup sees either the old or the new table.
///
/// The dataset comes from the first source that provides it:
///
/// ```mermaid
/// graph LR
/// A[ExplicitPath] -->|None| B[EnvPath]
/// B -->|None| C[CachedCopy]
/// C -->|None| D[RemoteRelease]
/// D -->|None| E[DataUnavailable]
/// A & B & C & D -->|text| P[parse]
/// P --> T[(annotations)]
/// T -->|commit| K[cached phenotype.hpoa]
/// ```
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use hpoa::{AnnotationStore, StoreConfig};
///
/// let store = AnnotationStore::open(StoreConfig::default()).unwrap();
/// store.load(Some(Path::new("tests/phenotype.hpoa"))).unwrap();
///
/// let rows = store.filter_by_disease("omim: 301500").unwrap();
/// assert_eq!(rows.len(), 2);
///
/// let rows = store.filter_by_disease("fabry").unwrap();
/// assert_eq!(rows.len(), 3);
///
/// let rows = store.filter_by_citation("2222").unwrap();
/// assert_eq!(rows[0].disease_name(), "Fabry disease");
/// ```
pub struct AnnotationStore {
    config: StoreConfig,
    conn: Mutex<Connection>,
    loading: Mutex<()>,
    loaded: AtomicBool,
    last_load: Mutex<Option<LoadSummary>>,
}

impl std::fmt::Debug for AnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationStore")
            .field("config", &self.config)
            .field("last_load", &self.last_load())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AnnotationStore {
    /// Opens the backing database
    ///
    /// Nothing is loaded yet, see [`AnnotationStore::ensure_loaded`].
    ///
    /// # Errors
    ///
    /// - [`HpoaError::Database`](crate::HpoaError::Database): the database cannot be opened
    /// - [`HpoaError::Io`](crate::HpoaError::Io): the database directory cannot be created
    pub fn open(config: StoreConfig) -> HpoaResult<Self> {
        let conn = match &config.db_path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                debug!("Opening annotation database {}", path.display());
                Connection::open(path)?
            }
            None => Connection::open_in_memory()?,
        };
        register_functions(&conn)?;
        Ok(Self {
            config,
            conn: Mutex::new(conn),
            loading: Mutex::new(()),
            loaded: AtomicBool::new(false),
            last_load: Mutex::new(None),
        })
    }

    /// The configuration the store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Loads the dataset and replaces the table
    ///
    /// The sources are tried in the order of [`StoreConfig::source_chain`].
    ///
    /// # Errors
    ///
    /// - [`HpoaError::DataUnavailable`](crate::HpoaError::DataUnavailable): no source provided the dataset
    /// - [`HpoaError::ParseError`](crate::HpoaError::ParseError): the header is missing or malformed.
    ///   The previous table stays in place
    pub fn load(&self, explicit: Option<&Path>) -> HpoaResult<LoadSummary> {
        let sources = self.config.source_chain(explicit);
        self.load_from_sources(&sources)
    }

    /// Loads the dataset from the first of `sources` that provides it
    ///
    /// # Errors
    ///
    /// See [`AnnotationStore::load`]
    pub fn load_from_sources(&self, sources: &[Box<dyn DatasetSource>]) -> HpoaResult<LoadSummary> {
        let _guard = lock(&self.loading);
        self.load_locked(sources)
    }

    /// Parses `text` as `phenotype.hpoa` and replaces the table
    ///
    /// # Errors
    ///
    /// - [`HpoaError::ParseError`](crate::HpoaError::ParseError): see [`AnnotationStore::load`]
    pub fn load_from_str(&self, text: &str) -> HpoaResult<LoadSummary> {
        let _guard = lock(&self.loading);
        let dataset = phenotype_hpoa::parse_str(text)?;
        self.replace(dataset, "text")
    }

    /// Loads the dataset unless the table already has rows
    ///
    /// Once the table is known to have rows, this returns without locking.
    /// Otherwise concurrent calls are serialized and only the first one loads.
    ///
    /// # Errors
    ///
    /// See [`AnnotationStore::load`]
    pub fn ensure_loaded(&self) -> HpoaResult<()> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        let _guard = lock(&self.loading);
        if self.is_loaded()? {
            trace!("Annotation table already loaded");
            self.loaded.store(true, Ordering::Release);
            return Ok(());
        }
        let sources = self.config.source_chain(None);
        self.load_locked(&sources).map(|_| ())
    }

    /// Returns `true` if the table exists and has at least one row
    ///
    /// # Errors
    ///
    /// - [`HpoaError::Database`](crate::HpoaError::Database)
    pub fn is_loaded(&self) -> HpoaResult<bool> {
        let conn = lock(&self.conn);
        if !table_exists(&conn)? {
            return Ok(false);
        }
        Ok(conn.query_row(schema::HAS_ROWS, [], |row| row.get(0))?)
    }

    /// Number of rows in the table, `0` if it does not exist
    ///
    /// # Errors
    ///
    /// - [`HpoaError::Database`](crate::HpoaError::Database)
    pub fn len(&self) -> HpoaResult<usize> {
        let conn = lock(&self.conn);
        if !table_exists(&conn)? {
            return Ok(0);
        }
        let rows: i64 = conn.query_row(schema::COUNT, [], |row| row.get(0))?;
        Ok(usize::try_from(rows).unwrap_or_default())
    }

    /// Summary of the last load of this instance
    pub fn last_load(&self) -> Option<LoadSummary> {
        lock(&self.last_load).clone()
    }

    /// Rows of a disease, by identifier or by name
    ///
    /// A query containing an `OMIM:`, `ORPHA:`, `MONDO:` or `DECIPHER:` identifier
    /// matches rows with exactly that `database_id`, ignoring case and whitespace.
    /// Any other query matches rows whose `disease_name` contains it, ignoring case.
    ///
    /// # Errors
    ///
    /// - [`HpoaError::DataUnavailable`](crate::HpoaError::DataUnavailable): nothing loaded and no source available
    pub fn filter_by_disease(&self, query: &str) -> HpoaResult<Vec<AnnotationRow>> {
        self.ensure_loaded()?;
        match disease_id(query) {
            Some(id) => {
                trace!("Disease id lookup {}", id);
                self.select(&schema::by_disease_id(), &id)
            }
            None => {
                let label = query.trim();
                if label.is_empty() {
                    return Ok(Vec::new());
                }
                trace!("Disease label lookup {}", label);
                self.select(&schema::by_disease_name(), &label.to_lowercase())
            }
        }
    }

    /// Rows citing a PubMed id
    ///
    /// Accepts `PMID:<digits>` or the bare digits. A row matches if its
    /// `reference` contains `PMID:<digits>`, so rows listing several references are found too.
    ///
    /// # Errors
    ///
    /// - [`HpoaError::DataUnavailable`](crate::HpoaError::DataUnavailable): nothing loaded and no source available
    pub fn filter_by_citation(&self, pmid: &str) -> HpoaResult<Vec<AnnotationRow>> {
        self.ensure_loaded()?;
        let Some(needle) = citation(pmid) else {
            return Ok(Vec::new());
        };
        trace!("Citation lookup {}", needle);
        self.select(&schema::by_reference(), &needle)
    }

    /// Rows annotated with a phenotype
    ///
    /// `term` is an `HP:` identifier or a label. Labels are resolved through
    /// `ontology`; an unresolved label yields an empty result.
    ///
    /// # Errors
    ///
    /// - [`HpoaError::DataUnavailable`](crate::HpoaError::DataUnavailable): nothing loaded and no source available
    pub fn filter_by_phenotype(
        &self,
        term: &str,
        ontology: &dyn OntologyAccess,
    ) -> HpoaResult<Vec<AnnotationRow>> {
        self.ensure_loaded()?;
        let Some(hpo_id) = phenotype_id(term, ontology) else {
            debug!("Unable to resolve phenotype {}", term);
            return Ok(Vec::new());
        };
        trace!("Phenotype lookup {}", hpo_id);
        self.select(&schema::by_hpo_id(), &hpo_id)
    }

    fn load_locked(&self, sources: &[Box<dyn DatasetSource>]) -> HpoaResult<LoadSummary> {
        let resolved = source::resolve(sources)?;
        let dataset = phenotype_hpoa::parse_str(&resolved.text)?;
        let summary = self.replace(dataset, resolved.source)?;
        if let Err(err) = resolved.commit() {
            warn!("Unable to record dataset from {}: {}", resolved.source, err);
        }
        Ok(summary)
    }

    /// Replaces the table with `dataset` in a single transaction
    fn replace(&self, dataset: ParsedDataset, source: &str) -> HpoaResult<LoadSummary> {
        let mut conn = lock(&self.conn);
        let tx = conn.transaction()?;
        tx.execute_batch(schema::RECREATE)?;
        {
            let mut stmt = tx.prepare(schema::INSERT)?;
            for columns in dataset.columns() {
                stmt.execute(params_from_iter(columns))?;
            }
        }
        tx.execute_batch(schema::INDEXES)?;
        tx.commit()?;
        drop(conn);
        self.loaded.store(!dataset.columns().is_empty(), Ordering::Release);

        let summary = LoadSummary {
            rows: dataset.columns().len(),
            skipped: dataset.skipped().len(),
            source: source.to_string(),
        };
        info!(
            "Loaded {} annotations from {} ({} skipped)",
            summary.rows, summary.source, summary.skipped
        );
        *lock(&self.last_load) = Some(summary.clone());
        Ok(summary)
    }

    fn select(&self, sql: &str, param: &str) -> HpoaResult<Vec<AnnotationRow>> {
        let conn = lock(&self.conn);
        let mut stmt = conn.prepare_cached(sql)?;
        let records = stmt.query_map([param], |row| {
            let mut cols: [String; 12] = Default::default();
            for (idx, col) in cols.iter_mut().enumerate() {
                *col = row.get(idx)?;
            }
            Ok(cols)
        })?;

        let mut res = Vec::new();
        for cols in records {
            let cols = cols?;
            let raw: RawRow<'_> = std::array::from_fn(|idx| cols[idx].as_str());
            match AnnotationRow::from_columns(&raw) {
                Ok(row) => res.push(row),
                Err(err) => warn!("Ignoring invalid stored row: {}", err),
            }
        }
        Ok(res)
    }
}

fn register_functions(conn: &Connection) -> HpoaResult<()> {
    conn.create_scalar_function(
        schema::FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
    )?;
    Ok(())
}

fn table_exists(conn: &Connection) -> HpoaResult<bool> {
    let tables: i64 = conn.query_row(schema::TABLE_EXISTS, [schema::TABLE], |row| row.get(0))?;
    Ok(tables > 0)
}

/// Upper-cases the query, removes whitespace and extracts a disease identifier
fn disease_id(query: &str) -> Option<String> {
    let normalized: String = query
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    DISEASE_ID
        .find(&normalized)
        .map(|id| id.as_str().to_string())
}

/// Builds the upper-cased `PMID:<digits>` needle
fn citation(pmid: &str) -> Option<String> {
    let pmid = pmid.trim();
    let digits = match pmid.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("PMID:") => &pmid[5..],
        _ => pmid,
    }
    .trim();
    if digits.is_empty() {
        return None;
    }
    Some(format!("PMID:{}", digits.to_uppercase()))
}

/// Returns the `HP:` identifier of `term`, resolving labels via `ontology`
///
/// Exact label matches are preferred over partial ones.
fn phenotype_id(term: &str, ontology: &dyn OntologyAccess) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let upper: String = term
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if HPO_ID.is_match(&upper) {
        return Some(upper);
    }
    [false, true].into_iter().find_map(|partial| {
        ontology
            .search(term, partial)
            .into_iter()
            .find(|id| id.is_hpo())
            .map(|id| id.to_string())
    })
}
