//! SQL of the `annotations` table

pub(crate) const TABLE: &str = "annotations";

/// Drops and recreates the table. Runs inside the replace transaction
pub(crate) const RECREATE: &str = "
DROP TABLE IF EXISTS annotations;
CREATE TABLE annotations (
    database_id   TEXT NOT NULL,
    disease_name  TEXT NOT NULL,
    qualifier     TEXT NOT NULL,
    hpo_id        TEXT NOT NULL,
    reference     TEXT NOT NULL,
    evidence      TEXT NOT NULL,
    onset         TEXT NOT NULL,
    frequency     TEXT NOT NULL,
    sex           TEXT NOT NULL,
    modifier      TEXT NOT NULL,
    aspect        TEXT NOT NULL,
    biocuration   TEXT NOT NULL
);";

/// One index per lookup
pub(crate) const INDEXES: &str = "
CREATE INDEX idx_annotations_database_id ON annotations (UPPER(REPLACE(database_id, ' ', '')));
CREATE INDEX idx_annotations_disease_name ON annotations (disease_name COLLATE NOCASE);
CREATE INDEX idx_annotations_reference ON annotations (reference COLLATE NOCASE);
CREATE INDEX idx_annotations_hpo_id ON annotations (hpo_id COLLATE NOCASE);";

pub(crate) const INSERT: &str = "
INSERT INTO annotations (
    database_id, disease_name, qualifier, hpo_id, reference, evidence,
    onset, frequency, sex, modifier, aspect, biocuration
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

pub(crate) const TABLE_EXISTS: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

pub(crate) const COUNT: &str = "SELECT COUNT(*) FROM annotations";

pub(crate) const HAS_ROWS: &str = "SELECT EXISTS (SELECT 1 FROM annotations)";

/// Scalar SQL function applying Unicode lower-casing, registered on every connection
pub(crate) const FOLD_CASE: &str = "fold_case";

const SELECT: &str = "
SELECT database_id, disease_name, qualifier, hpo_id, reference, evidence,
       onset, frequency, sex, modifier, aspect, biocuration
FROM annotations";

/// Rows whose normalized `database_id` equals `?1`
pub(crate) fn by_disease_id() -> String {
    format!("{SELECT} WHERE UPPER(REPLACE(database_id, ' ', '')) = ?1 ORDER BY rowid")
}

/// Rows whose `disease_name` contains the lower-cased `?1`, ignoring case
pub(crate) fn by_disease_name() -> String {
    format!("{SELECT} WHERE instr({FOLD_CASE}(disease_name), ?1) > 0 ORDER BY rowid")
}

/// Rows whose `reference` contains the upper-cased `?1`
pub(crate) fn by_reference() -> String {
    format!("{SELECT} WHERE instr(UPPER(reference), ?1) > 0 ORDER BY rowid")
}

/// Rows whose `hpo_id` equals `?1`, ignoring case
pub(crate) fn by_hpo_id() -> String {
    format!("{SELECT} WHERE hpo_id = ?1 COLLATE NOCASE ORDER BY rowid")
}
