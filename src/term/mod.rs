//! Term identifiers and sets of identifiers
//!
//! Both ontologies (HPO and MONDO) and the annotation dataset reference terms by their
//! CURIE, e.g. `HP:0000118` or `MONDO:0700096`. A [`TermId`] holds one validated
//! CURIE, a [`TermGroup`] a sorted set of them.

mod group;
mod termid;

pub use group::{TermGroup, TermIds};
pub use termid::TermId;

/// The direct parents of a term
pub type TermParents = TermGroup;
/// The direct children of a term
pub type TermChildren = TermGroup;
