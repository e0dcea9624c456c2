use crate::term::{TermChildren, TermGroup, TermId, TermParents};
use crate::{DEFAULT_NUM_ALL_PARENTS, DEFAULT_NUM_PARENTS};

/// Crate-internal representation of a single ontology term
#[derive(Debug)]
pub(crate) struct TermInternal {
    id: TermId,
    name: String,
    definition: Option<String>,
    synonyms: Vec<String>,
    search_names: Vec<String>,
    parents: TermParents,
    all_parents: TermGroup,
    parents_cached: bool,
    children: TermChildren,
    relationships: Vec<(String, TermId)>,
    obsolete: bool,
}

impl TermInternal {
    pub fn new(id: TermId, name: String) -> TermInternal {
        TermInternal {
            search_names: vec![name.to_lowercase()],
            id,
            name,
            definition: None,
            synonyms: Vec::new(),
            parents: TermGroup::with_capacity(DEFAULT_NUM_PARENTS),
            all_parents: TermGroup::with_capacity(DEFAULT_NUM_ALL_PARENTS),
            parents_cached: false,
            children: TermGroup::with_capacity(DEFAULT_NUM_PARENTS),
            relationships: Vec::new(),
            obsolete: false,
        }
    }

    pub fn id(&self) -> &TermId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    pub fn set_definition(&mut self, definition: String) {
        self.definition = Some(definition);
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub fn add_synonym(&mut self, synonym: String) {
        self.search_names.push(synonym.to_lowercase());
        self.synonyms.push(synonym);
    }

    /// Lower-cased name and synonyms
    pub fn search_names(&self) -> &[String] {
        &self.search_names
    }

    pub fn parents(&self) -> &TermParents {
        &self.parents
    }

    pub fn children(&self) -> &TermChildren {
        &self.children
    }

    pub fn all_parents(&self) -> &TermGroup {
        &self.all_parents
    }

    pub fn set_all_parents(&mut self, all_parents: TermGroup) {
        self.all_parents = all_parents;
        self.parents_cached = true;
    }

    pub fn parents_cached(&self) -> bool {
        self.parents_cached
    }

    pub fn add_parent(&mut self, parent_id: TermId) {
        self.parents.insert(parent_id);
        self.parents_cached = false;
    }

    pub fn add_child(&mut self, child_id: TermId) {
        self.children.insert(child_id);
    }

    pub fn relationships(&self) -> &[(String, TermId)] {
        &self.relationships
    }

    pub fn add_relationship(&mut self, predicate: String, target: TermId) {
        self.relationships.push((predicate, target));
    }

    pub fn obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn obsolete_mut(&mut self) -> &mut bool {
        &mut self.obsolete
    }
}

impl PartialEq for TermInternal {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TermInternal {}
