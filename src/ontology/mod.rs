//! Access to ontology terms, their labels and their ancestors
//!
//! The [`AnnotationStore`](crate::AnnotationStore) and the
//! [`Categorizer`](crate::Categorizer) only talk to ontologies through the
//! [`OntologyAccess`] trait. The phenotype ontology (HPO) and the disease
//! ontology (MONDO) are two independent instances.
//!
//! [`Ontology`] implements the trait on top of an OBO file.

use core::fmt::Debug;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::parser;
use crate::term::{TermGroup, TermId};
use crate::HpoaResult;

mod internal;
mod termarena;
pub(crate) use internal::TermInternal;
use termarena::Arena;

/// Predicate used for `is_a` edges in [`OntologyAccess::outgoing_relationships`]
pub const SUBCLASS_OF: &str = "rdfs:subClassOf";

/// Read-only access to one ontology
///
/// Identifiers are passed as plain text, because they often come straight
/// from user input or a language model and can be misspelled, stale or invented.
/// Every method must cope with unknown identifiers and return `None` or an
/// empty result instead of failing.
pub trait OntologyAccess: Send + Sync {
    /// The primary label of the term
    fn label(&self, id: &str) -> Option<String>;

    /// The textual definition of the term
    fn definition(&self, id: &str) -> Option<String>;

    /// All terms reachable via `is_a` edges towards the root
    ///
    /// If `reflexive` is `true` the term itself is part of the result
    fn ancestors(&self, id: &str, reflexive: bool) -> TermGroup;

    /// The direct `is_a` children of the term
    ///
    /// Returns `None` if the implementation cannot list children at all.
    /// Callers then fall back to [`OntologyAccess::outgoing_relationships`].
    fn children(&self, _id: &str) -> Option<Vec<TermId>> {
        None
    }

    /// All outgoing edges as `(predicate, target)`
    ///
    /// `is_a` edges are reported with the [`SUBCLASS_OF`] predicate
    fn outgoing_relationships(&self, id: &str) -> Vec<(String, TermId)>;

    /// Searches terms by label and synonyms
    ///
    /// With `partial` set to `false` only exact (case-insensitive) matches are returned.
    /// Results are ordered by match quality.
    fn search(&self, text: &str, partial: bool) -> Vec<TermId>;
}

impl<T: OntologyAccess + ?Sized> OntologyAccess for Arc<T> {
    fn label(&self, id: &str) -> Option<String> {
        (**self).label(id)
    }

    fn definition(&self, id: &str) -> Option<String> {
        (**self).definition(id)
    }

    fn ancestors(&self, id: &str, reflexive: bool) -> TermGroup {
        (**self).ancestors(id, reflexive)
    }

    fn children(&self, id: &str) -> Option<Vec<TermId>> {
        (**self).children(id)
    }

    fn outgoing_relationships(&self, id: &str) -> Vec<(String, TermId)> {
        (**self).outgoing_relationships(id)
    }

    fn search(&self, text: &str, partial: bool) -> Vec<TermId> {
        (**self).search(text, partial)
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// An in-memory ontology built from an OBO file
///
/// All ancestor sets are computed once while building the ontology, afterwards
/// the ontology is immutable and can be shared between threads.
///
/// # Examples
///
/// ```
/// use hpoa::{Ontology, OntologyAccess};
///
/// let ontology = Ontology::from_obo_file("tests/example.obo").unwrap();
///
/// assert_eq!(ontology.label("HP:0000118").unwrap(), "Phenotypic abnormality");
/// assert!(ontology.label("HP:9999999").is_none());
///
/// let ancestors = ontology.ancestors("HP:0001631", false);
/// assert!(ancestors.contains(&"HP:0001626".try_into().unwrap()));
/// ```
///
/// # Example ontology
///
/// All examples and tests use the following small subset of HPO
/// (`tests/example.obo`):
///
/// ```mermaid
/// graph TD
/// HP:0000001["HP:0000001<br>All"]
/// HP:0000001 --> HP:0000005
/// HP:0000001 --> HP:0000118
/// HP:0000001 --> HP:0012823
/// HP:0000001 --> HP:0031797
/// HP:0000001 --> HP:0040279
/// HP:0000005["HP:0000005<br>Mode of inheritance"] --> HP:0000007["HP:0000007<br>Autosomal recessive inheritance"]
/// HP:0000118["HP:0000118<br>Phenotypic abnormality"]
/// HP:0000118 --> HP:0000707["HP:0000707<br>Abnormality of the nervous system"]
/// HP:0000118 --> HP:0001626["HP:0001626<br>Abnormality of the cardiovascular system"]
/// HP:0000118 --> HP:0000119["HP:0000119<br>Abnormality of the genitourinary system"]
/// HP:0000118 --> HP:0001939["HP:0001939<br>Abnormality of metabolism/homeostasis"]
/// HP:0000707 --> HP:0012638["HP:0012638<br>Abnormal nervous system physiology"]
/// HP:0012638 --> HP:0001250["HP:0001250<br>Seizure"]
/// HP:0012638 --> HP:0001297["HP:0001297<br>Stroke"]
/// HP:0001626 --> HP:0030680["HP:0030680<br>Abnormality of cardiovascular system morphology"]
/// HP:0001626 --> HP:0030956["HP:0030956<br>Abnormality of cardiovascular system physiology"]
/// HP:0030956 --> HP:0001297
/// HP:0030680 --> HP:0001627["HP:0001627<br>Abnormal heart morphology"]
/// HP:0001627 --> HP:0001631["HP:0001631<br>Atrial septal defect"]
/// HP:0000119 --> HP:0000077["HP:0000077<br>Abnormality of the kidney"]
/// HP:0031797["HP:0031797<br>Clinical course"] --> HP:0003674["HP:0003674<br>Onset"]
/// HP:0003674 --> HP:0003593["HP:0003593<br>Infantile onset"]
/// HP:0040279["HP:0040279<br>Frequency"] --> HP:0040283["HP:0040283<br>Occasional"]
/// ```
#[derive(Default)]
pub struct Ontology {
    terms: Arena,
    version: Option<String>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ontology with {} terms", self.terms.len())
    }
}

/// Public API of the Ontology
impl Ontology {
    /// Builds the ontology from an OBO file, e.g. `hp.obo` or `mondo.obo`
    ///
    /// # Errors
    ///
    /// - [`HpoaError::CannotOpenFile`](crate::HpoaError::CannotOpenFile): file is missing or unreadable
    pub fn from_obo_file<P: AsRef<Path>>(filename: P) -> HpoaResult<Self> {
        parser::obo::read_obo_file(filename)
    }

    /// Builds the ontology from the content of an OBO file
    ///
    /// # Errors
    ///
    /// - [`HpoaError::InvalidInput`](crate::HpoaError::InvalidInput): the text does not contain any term
    pub fn from_obo_str(content: &str) -> HpoaResult<Self> {
        parser::obo::parse_str(content)
    }

    /// Returns the number of terms, including obsolete terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the Ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `data-version` header of the OBO file, e.g. `hp/releases/2024-01-16`
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns `true` if the term is part of the ontology and not obsolete
    pub fn is_active(&self, id: &str) -> bool {
        self.term(id).map_or(false, |term| !term.obsolete())
    }

    /// Returns the synonyms of the term
    pub fn synonyms(&self, id: &str) -> &[String] {
        match self.term(id) {
            Some(term) => term.synonyms(),
            None => &[],
        }
    }
}

/// Methods to build the Ontology
///
/// These are used by the OBO parser and should rarely be needed by clients.
impl Ontology {
    pub(crate) fn set_version(&mut self, version: String) {
        self.version = Some(version);
    }

    pub(crate) fn add_term(&mut self, term: TermInternal) {
        self.terms.insert(term);
    }

    /// Adds an `is_a` connection from `child_id` to `parent_id`
    ///
    /// Returns `false` and leaves the ontology unchanged if one of the terms is missing
    pub(crate) fn add_parent(&mut self, parent_id: &TermId, child_id: &TermId) -> bool {
        if !self.terms.contains(parent_id) || !self.terms.contains(child_id) {
            return false;
        }
        if let Some(parent) = self.terms.get_mut(parent_id) {
            parent.add_child(child_id.clone());
        }
        if let Some(child) = self.terms.get_mut(child_id) {
            child.add_parent(parent_id.clone());
        }
        true
    }

    /// Caches the ancestors of every term
    ///
    /// Must be called after all terms and parent connections have been added.
    pub(crate) fn create_cache(&mut self) {
        for id in self.terms.keys() {
            let mut visiting = HashSet::new();
            self.cache_all_parents(&id, &mut visiting);
        }
        debug!("Cached ancestors of {} terms", self.terms.len());
    }

    /// Recursively collects the direct and indirect parents of a term
    ///
    /// The recursion bubbles up towards the root and caches the ancestors of
    /// every term on its way back down. It stops at terms that are already cached.
    fn cache_all_parents(&mut self, term_id: &TermId, visiting: &mut HashSet<TermId>) -> TermGroup {
        let Some(term) = self.terms.get(term_id) else {
            return TermGroup::new();
        };
        if term.parents_cached() {
            return term.all_parents().clone();
        }
        if !visiting.insert(term_id.clone()) {
            warn!("Cyclic is_a relationship through {}", term_id);
            return TermGroup::new();
        }

        let parents = term.parents().clone();
        let mut res = parents.clone();
        for parent in &parents {
            let grandparents = self.cache_all_parents(parent, visiting);
            res = &res | &grandparents;
        }
        if let Some(term) = self.terms.get_mut(term_id) {
            term.set_all_parents(res.clone());
        }
        res
    }

    fn term(&self, id: &str) -> Option<&TermInternal> {
        let id = TermId::try_from(id).ok()?;
        self.terms.get(&id)
    }
}

impl OntologyAccess for Ontology {
    fn label(&self, id: &str) -> Option<String> {
        self.term(id).map(|term| term.name().to_string())
    }

    fn definition(&self, id: &str) -> Option<String> {
        self.term(id)
            .and_then(TermInternal::definition)
            .map(str::to_string)
    }

    fn ancestors(&self, id: &str, reflexive: bool) -> TermGroup {
        let Some(term) = self.term(id) else {
            return TermGroup::new();
        };
        let mut ancestors = term.all_parents().clone();
        if reflexive {
            ancestors.insert(term.id().clone());
        }
        ancestors
    }

    fn children(&self, id: &str) -> Option<Vec<TermId>> {
        Some(
            self.term(id)
                .map(|term| term.children().iter().cloned().collect())
                .unwrap_or_default(),
        )
    }

    fn outgoing_relationships(&self, id: &str) -> Vec<(String, TermId)> {
        let Some(term) = self.term(id) else {
            return Vec::new();
        };
        term.parents()
            .iter()
            .map(|parent| (SUBCLASS_OF.to_string(), parent.clone()))
            .chain(term.relationships().iter().cloned())
            .collect()
    }

    fn search(&self, text: &str, partial: bool) -> Vec<TermId> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        if let Some(term) = self.term(&needle) {
            return vec![term.id().clone()];
        }

        let mut hits: Vec<(u8, &TermId)> = self
            .terms
            .values()
            .filter(|term| !term.obsolete())
            .filter_map(|term| {
                term.search_names()
                    .iter()
                    .filter_map(|name| match_rank(name, &needle, partial))
                    .min()
                    .map(|rank| (rank, term.id()))
            })
            .collect();
        hits.sort();
        hits.into_iter().map(|(_, id)| id.clone()).collect()
    }
}

/// Ranks how well a lower-cased name matches the lower-cased search text
///
/// `0` is an exact match, `1` a prefix match and `2` any other substring match
fn match_rank(name: &str, needle: &str, partial: bool) -> Option<u8> {
    if name == needle {
        Some(0)
    } else if !partial {
        None
    } else if name.starts_with(needle) {
        Some(1)
    } else if name.contains(needle) {
        Some(2)
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ontology() -> Ontology {
        Ontology::from_obo_file("tests/example.obo").expect("example ontology is valid")
    }

    fn id(s: &str) -> TermId {
        TermId::try_from(s).unwrap()
    }

    #[test]
    fn labels_and_definitions() {
        let ont = ontology();
        assert_eq!(ont.label("HP:0001250").unwrap(), "Seizure");
        assert_eq!(ont.label("hp:0001250").unwrap(), "Seizure");
        assert!(ont.definition("HP:0001250").unwrap().starts_with("A seizure"));
        assert!(ont.definition("HP:0000001").is_none());
        assert_eq!(ont.version().unwrap(), "hp/releases/2024-01-16");
    }

    #[test]
    fn unknown_ids_are_empty() {
        let ont = ontology();
        for missing in ["HP:9999999", "not an id", "", "MONDO:0000001"] {
            assert!(ont.label(missing).is_none());
            assert!(ont.definition(missing).is_none());
            assert!(ont.ancestors(missing, true).is_empty());
            assert_eq!(ont.children(missing), Some(Vec::new()));
            assert!(ont.outgoing_relationships(missing).is_empty());
        }
    }

    #[test]
    fn ancestors() {
        let ont = ontology();
        let ancestors = ont.ancestors("HP:0001631", false);
        assert_eq!(ancestors.len(), 5);
        for parent in [
            "HP:0000001",
            "HP:0000118",
            "HP:0001626",
            "HP:0030680",
            "HP:0001627",
        ] {
            assert!(ancestors.contains(&id(parent)), "missing {parent}");
        }
        assert!(!ancestors.contains(&id("HP:0001631")));
        assert!(ont
            .ancestors("HP:0001631", true)
            .contains(&id("HP:0001631")));
    }

    #[test]
    fn ancestors_with_multiple_parents() {
        let ont = ontology();
        let ancestors = ont.ancestors("HP:0001297", false);
        assert!(ancestors.contains(&id("HP:0000707")));
        assert!(ancestors.contains(&id("HP:0001626")));
    }

    #[test]
    fn root_has_no_ancestors() {
        let ont = ontology();
        assert!(ont.ancestors("HP:0000001", false).is_empty());
        assert_eq!(ont.ancestors("HP:0000001", true).len(), 1);
    }

    #[test]
    fn children() {
        let ont = ontology();
        let children = ont.children("HP:0001626").unwrap();
        assert_eq!(children, vec![id("HP:0030680"), id("HP:0030956")]);
    }

    #[test]
    fn outgoing_relationships() {
        let ont = ontology();
        let rels = ont.outgoing_relationships("HP:0001297");
        assert_eq!(rels.len(), 2);
        assert!(rels
            .iter()
            .all(|(predicate, _)| predicate == SUBCLASS_OF));
    }

    #[test]
    fn search_exact() {
        let ont = ontology();
        assert_eq!(ont.search("seizure", false), vec![id("HP:0001250")]);
        assert!(ont.search("seiz", false).is_empty());
    }

    #[test]
    fn search_partial_ranks_better_matches_first() {
        let ont = ontology();
        let hits = ont.search("abnormality of the", true);
        assert!(hits.len() > 2);
        assert!(hits.contains(&id("HP:0000707")));

        let hits = ont.search("heart", true);
        assert_eq!(hits[0], id("HP:0001627"));
    }

    #[test]
    fn search_by_synonym_and_id() {
        let ont = ontology();
        assert_eq!(ont.search("ASD", false), vec![id("HP:0001631")]);
        assert_eq!(ont.search("HP:0001631", true), vec![id("HP:0001631")]);
    }

    #[test]
    fn search_skips_obsolete() {
        let ont = ontology();
        assert!(!ont.is_active("HP:0000002"));
        assert!(ont.label("HP:0000002").is_some());
        assert!(ont.search("abnormality of body height", true).is_empty());
    }

    #[test]
    fn search_empty() {
        let ont = ontology();
        assert!(ont.search("   ", true).is_empty());
        assert!(ont.search("xyzzy", true).is_empty());
    }

    #[test]
    fn shared_through_arc() {
        let ont: Arc<dyn OntologyAccess> = Arc::new(ontology());
        assert_eq!(ont.label("HP:0000118").unwrap(), "Phenotypic abnormality");
    }
}
