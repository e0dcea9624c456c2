//! Parsing of the HPO master data
//!
//! - [`phenotype_hpoa`]: the tab-delimited annotation dataset `phenotype.hpoa`
//! - [`obo`]: ontology files in OBO format, e.g. `hp.obo` or `mondo.obo`

pub mod obo;
pub mod phenotype_hpoa;
