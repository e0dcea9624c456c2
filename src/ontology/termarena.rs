use std::collections::hash_map::Values;
use std::collections::HashMap;

use crate::ontology::internal::TermInternal;
use crate::term::TermId;

/// Owns all terms of one ontology, keyed by their [`TermId`]
pub(crate) struct Arena {
    terms: HashMap<TermId, TermInternal>,
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn insert(&mut self, term: TermInternal) {
        self.terms.insert(term.id().clone(), term);
    }

    pub fn get(&self, id: &TermId) -> Option<&TermInternal> {
        self.terms.get(id)
    }

    pub fn get_mut(&mut self, id: &TermId) -> Option<&mut TermInternal> {
        self.terms.get_mut(id)
    }

    pub fn contains(&self, id: &TermId) -> bool {
        self.terms.contains_key(id)
    }

    pub fn values(&self) -> Values<'_, TermId, TermInternal> {
        self.terms.values()
    }

    pub fn keys(&self) -> Vec<TermId> {
        self.terms.keys().cloned().collect()
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: HashMap::with_capacity(20_000),
        }
    }
}
