//! Term search helpers
//!
//! Turn free text into candidate terms with their label and definition,
//! e.g. to let a user pick the right phenotype or disease before a lookup.
use serde::Serialize;

use crate::ontology::OntologyAccess;
use crate::term::TermId;
use crate::HUMAN_DISEASE;

/// Default number of search results
pub const DEFAULT_LIMIT: usize = 20;

/// A search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermSummary {
    pub id: TermId,
    pub label: Option<String>,
    pub definition: Option<String>,
}

impl TermSummary {
    /// Collects label and definition of `id`
    pub fn new<O: OntologyAccess + ?Sized>(ontology: &O, id: TermId) -> Self {
        Self {
            label: ontology.label(id.as_str()),
            definition: ontology.definition(id.as_str()),
            id,
        }
    }
}

/// Partial search for `text`, returning at most `limit` hits that pass `keep`
fn search_filtered<O, F>(ontology: &O, text: &str, limit: usize, keep: F) -> Vec<TermSummary>
where
    O: OntologyAccess + ?Sized,
    F: Fn(&TermId) -> bool,
{
    ontology
        .search(text, true)
        .into_iter()
        .filter(|id| keep(id))
        .take(limit)
        .map(|id| TermSummary::new(ontology, id))
        .collect()
}

/// Partial search for `text`
///
/// # Examples
///
/// ```
/// use hpoa::Ontology;
/// use hpoa::lookup::search_terms;
///
/// let ontology = Ontology::from_obo_file("tests/example.obo").unwrap();
/// let hits = search_terms(&ontology, "heart", 5);
/// assert_eq!(hits[0].id.as_str(), "HP:0001627");
/// assert_eq!(hits[0].label.as_deref(), Some("Abnormal heart morphology"));
/// ```
pub fn search_terms<O: OntologyAccess + ?Sized>(ontology: &O, text: &str, limit: usize) -> Vec<TermSummary> {
    search_filtered(ontology, text, limit, |_| true)
}

/// Partial search for phenotypes, inheritance modes, onsets and frequencies
///
/// Only `HP:` terms are returned.
pub fn search_phenotypes<O: OntologyAccess + ?Sized>(hpo: &O, text: &str) -> Vec<TermSummary> {
    search_filtered(hpo, text, DEFAULT_LIMIT, TermId::is_hpo)
}

/// Partial search for human diseases
///
/// Only terms below `MONDO:0700096 | human disease` are returned,
/// animal diseases are excluded.
///
/// # Examples
///
/// ```
/// use hpoa::Ontology;
/// use hpoa::lookup::search_diseases;
///
/// let mondo = Ontology::from_obo_file("tests/mondo.obo").unwrap();
/// let hits = search_diseases(&mondo, "epilepsy");
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id.as_str(), "MONDO:0005027");
/// ```
pub fn search_diseases<O: OntologyAccess + ?Sized>(mondo: &O, text: &str) -> Vec<TermSummary> {
    let Ok(root) = TermId::try_from(HUMAN_DISEASE) else {
        return Vec::new();
    };
    search_filtered(mondo, text, DEFAULT_LIMIT, |id| {
        mondo.ancestors(id.as_str(), true).contains(&root)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Ontology;

    #[test]
    fn terms_with_limit() {
        let hpo = Ontology::from_obo_file("tests/example.obo").unwrap();
        let hits = search_terms(&hpo, "abnormality", 3);
        assert_eq!(hits.len(), 3);
        assert!(search_terms(&hpo, "abnormality", 0).is_empty());
    }

    #[test]
    fn summary_fields() {
        let hpo = Ontology::from_obo_file("tests/example.obo").unwrap();
        let hits = search_phenotypes(&hpo, "seizure");
        assert_eq!(hits[0].id.as_str(), "HP:0001250");
        assert_eq!(hits[0].label.as_deref(), Some("Seizure"));
        assert!(hits[0].definition.as_deref().unwrap().starts_with("A seizure"));

        let root = search_phenotypes(&hpo, "All");
        assert_eq!(root[0].definition, None);
    }

    #[test]
    fn phenotypes_only_hpo() {
        let mondo = Ontology::from_obo_file("tests/mondo.obo").unwrap();
        assert!(search_phenotypes(&mondo, "disease").is_empty());
    }

    #[test]
    fn human_diseases_only() {
        let mondo = Ontology::from_obo_file("tests/mondo.obo").unwrap();
        let hits = search_diseases(&mondo, "disease");
        let ids: Vec<&str> = hits.iter().map(|hit| hit.id.as_str()).collect();
        assert!(ids.contains(&"MONDO:0700096"));
        assert!(ids.contains(&"MONDO:0010526"));
        assert!(!ids.contains(&"MONDO:0000001"));
        assert!(!ids.contains(&"MONDO:0005583"));

        let hits = search_diseases(&mondo, "epileptic syndrome");
        assert_eq!(hits[0].id.as_str(), "MONDO:0005027");
    }

    #[test]
    fn nothing_found() {
        let mondo = Ontology::from_obo_file("tests/mondo.obo").unwrap();
        assert!(search_diseases(&mondo, "xyzzy").is_empty());
        assert!(search_diseases(&mondo, "").is_empty());
    }

    #[test]
    fn serialize_summary() {
        let hpo = Ontology::from_obo_file("tests/example.obo").unwrap();
        let hits = search_phenotypes(&hpo, "ASD");
        let json = serde_json::to_string(&hits[0]).unwrap();
        assert!(json.contains("\"id\":\"HP:0001631\""));
    }
}
