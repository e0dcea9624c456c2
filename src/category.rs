//! Buckets terms into the top-level categories of an ontology
//!
//! A category is an immediate child of a category root, e.g. the organ systems
//! below `HP:0000118 | Phenotypic abnormality` or the disease classes below
//! `MONDO:0700096 | human disease`. A term belongs to every category that is
//! part of its reflexive ancestor set.
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::trace;

use crate::ontology::{OntologyAccess, SUBCLASS_OF};
use crate::term::{TermGroup, TermId};

/// A top-level category term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: TermId,
    pub label: String,
}

/// Read-through caches of ontology responses, keyed by term id
///
/// The ontology does not change while the cache is in use, so entries
/// never expire. Share one cache between categorizers of the same ontology
/// or call [`CategoryCache::clear`] to start over.
#[derive(Debug, Default)]
pub struct CategoryCache {
    labels: Mutex<HashMap<TermId, Option<String>>>,
    ancestors: Mutex<HashMap<TermId, TermGroup>>,
    children: Mutex<HashMap<TermId, Option<Vec<TermId>>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CategoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all entries
    pub fn clear(&self) {
        lock(&self.labels).clear();
        lock(&self.ancestors).clear();
        lock(&self.children).clear();
    }

    /// Number of cached ancestor sets
    pub fn cached_ancestors(&self) -> usize {
        lock(&self.ancestors).len()
    }

    fn label<O: OntologyAccess + ?Sized>(&self, ontology: &O, id: &TermId) -> Option<String> {
        if let Some(label) = lock(&self.labels).get(id) {
            return label.clone();
        }
        let label = ontology.label(id.as_str());
        lock(&self.labels).insert(id.clone(), label.clone());
        label
    }

    /// Reflexive ancestors
    fn ancestors<O: OntologyAccess + ?Sized>(&self, ontology: &O, id: &TermId) -> TermGroup {
        if let Some(ancestors) = lock(&self.ancestors).get(id) {
            trace!("Ancestor cache hit for {}", id);
            return ancestors.clone();
        }
        let ancestors = ontology.ancestors(id.as_str(), true);
        lock(&self.ancestors).insert(id.clone(), ancestors.clone());
        ancestors
    }

    fn children<O: OntologyAccess + ?Sized>(&self, ontology: &O, id: &TermId) -> Option<Vec<TermId>> {
        if let Some(children) = lock(&self.children).get(id) {
            return children.clone();
        }
        let children = ontology.children(id.as_str());
        lock(&self.children).insert(id.clone(), children.clone());
        children
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Assigns terms to the categories below a root term
///
/// ```mermaid
/// graph TD
/// R[HP:0000118 Phenotypic abnormality] --> N[HP:0000707 nervous system]
/// R --> C[HP:0001626 cardiovascular system]
/// N --> S[HP:0001297 Stroke]
/// C --> S
/// ```
///
/// `Stroke` belongs to both categories.
///
/// # Examples
///
/// ```
/// use hpoa::{Categorizer, Ontology, PHENOTYPIC_ABNORMALITY};
///
/// let ontology = Ontology::from_obo_file("tests/example.obo").unwrap();
/// let categorizer = Categorizer::new(ontology);
///
/// let categories = categorizer.categorize("HP:0001297", PHENOTYPIC_ABNORMALITY);
/// let labels: Vec<&str> = categories.iter().map(|c| c.label.as_str()).collect();
/// assert_eq!(
///     labels,
///     ["Abnormality of the nervous system", "Abnormality of the cardiovascular system"]
/// );
///
/// let cardiac = categorizer.resolve_category_root("cardiovascular", PHENOTYPIC_ABNORMALITY).unwrap();
/// assert_eq!(cardiac.id.as_str(), "HP:0001626");
/// ```
#[derive(Debug)]
pub struct Categorizer<O: OntologyAccess> {
    ontology: O,
    cache: Arc<CategoryCache>,
}

impl<O: OntologyAccess> Categorizer<O> {
    /// Creates a categorizer with its own cache
    pub fn new(ontology: O) -> Self {
        Self::with_cache(ontology, Arc::new(CategoryCache::new()))
    }

    /// Creates a categorizer that uses the given cache
    pub fn with_cache(ontology: O, cache: Arc<CategoryCache>) -> Self {
        Self { ontology, cache }
    }

    /// The underlying ontology
    pub fn ontology(&self) -> &O {
        &self.ontology
    }

    /// The cache of ontology responses
    pub fn cache(&self) -> &CategoryCache {
        &self.cache
    }

    /// Returns the categories below `root`, i.e. its immediate children
    ///
    /// Returns `None` if the ontology cannot list children.
    pub fn categories(&self, root: &str) -> Option<Vec<Category>> {
        let root = TermId::try_from(root).ok()?;
        let children = self.cache.children(&self.ontology, &root)?;
        Some(children.iter().map(|id| self.category(id)).collect())
    }

    /// Returns the categories below `root` that `term` belongs to
    ///
    /// A term that is itself a category belongs to that category. Unknown terms
    /// and terms outside of `root` return an empty result.
    pub fn categorize(&self, term: &str, root: &str) -> Vec<Category> {
        let (Ok(term), Ok(root)) = (TermId::try_from(term), TermId::try_from(root)) else {
            return Vec::new();
        };
        let ancestors = self.cache.ancestors(&self.ontology, &term);
        if ancestors.is_empty() {
            return Vec::new();
        }

        match self.cache.children(&self.ontology, &root) {
            Some(children) => children
                .iter()
                .filter(|child| ancestors.contains(child))
                .map(|child| self.category(child))
                .collect(),
            None => ancestors
                .iter()
                .filter(|ancestor| self.is_direct_child(ancestor, &root))
                .map(|ancestor| self.category(ancestor))
                .collect(),
        }
    }

    /// Finds the category below `root` that best matches a free-text name
    ///
    /// The text is matched against the category labels, first exactly, then as a
    /// substring, ignoring case. Otherwise the best ontology search hit for the text
    /// is categorized and its first category is returned.
    pub fn resolve_category_root(&self, text: &str, root: &str) -> Option<Category> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(categories) = self.categories(root) {
            if let Some(category) = categories
                .iter()
                .find(|cat| cat.label.to_lowercase() == needle || cat.id.as_str().eq_ignore_ascii_case(&needle))
                .or_else(|| {
                    categories
                        .iter()
                        .find(|cat| cat.label.to_lowercase().contains(&needle))
                })
            {
                return Some(category.clone());
            }
        }

        let best = self.ontology.search(&needle, true).into_iter().next()?;
        trace!("Resolving category via search hit {}", best);
        self.categorize(best.as_str(), root).into_iter().next()
    }

    fn category(&self, id: &TermId) -> Category {
        Category {
            id: id.clone(),
            label: self
                .cache
                .label(&self.ontology, id)
                .unwrap_or_else(|| id.to_string()),
        }
    }

    fn is_direct_child(&self, id: &TermId, root: &TermId) -> bool {
        self.ontology
            .outgoing_relationships(id.as_str())
            .iter()
            .any(|(predicate, target)| predicate == SUBCLASS_OF && target == root)
    }
}
