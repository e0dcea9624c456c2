//! Parser for ontologies in OBO format
//!
//! Only `[Term]` stanzas are used, `[Typedef]` and other stanzas are ignored.
//! Of each term the parser reads
//!
//! - `id`, `name`, `def` and `synonym`
//! - `is_a`: the parent terms, forming the ancestor hierarchy
//! - `relationship`: any other outgoing relationship, e.g. `part_of`
//! - `is_obsolete`
//!
//! The `data-version` header line is kept as the ontology version.
use std::fs;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::ontology::TermInternal;
use crate::term::TermId;
use crate::{HpoaError, HpoaResult, Ontology};

/// Tuples of (child, parent)
type Connections = Vec<(TermId, TermId)>;

/// Reads an OBO file and builds the [`Ontology`]
///
/// # Errors
///
/// - [`HpoaError::CannotOpenFile`]: Source file not present or can't be opened
/// - [`HpoaError::InvalidInput`]: the file does not contain any term
pub fn read_obo_file<P: AsRef<Path>>(filename: P) -> HpoaResult<Ontology> {
    let name = filename.as_ref().display().to_string();
    let content = fs::read_to_string(filename).map_err(|_| HpoaError::CannotOpenFile(name))?;
    parse_str(&content)
}

/// Builds the [`Ontology`] from the content of an OBO file
///
/// # Errors
///
/// - [`HpoaError::InvalidInput`]: the content does not contain any term
pub fn parse_str(content: &str) -> HpoaResult<Ontology> {
    let mut ontology = Ontology::default();
    let mut connections: Connections = Vec::new();

    for stanza in stanzas(content) {
        match stanza.first() {
            Some(&"[Term]") => match term_from_obo(&stanza[1..]) {
                Some((term, parents)) => {
                    connections.extend(parents.into_iter().map(|parent| (term.id().clone(), parent)));
                    ontology.add_term(term);
                }
                None => warn!("Unable to parse term: {}", stanza.join(" | ")),
            },
            Some(line) if line.starts_with('[') => trace!("Ignoring stanza {}", line),
            Some(_) => {
                if let Some(version) = stanza
                    .iter()
                    .find_map(|line| line.strip_prefix("data-version:"))
                {
                    ontology.set_version(version.trim().to_string());
                }
            }
            None => (),
        }
    }

    if ontology.is_empty() {
        return Err(HpoaError::InvalidInput("OBO content contains no terms".to_string()));
    }

    for (child, parent) in connections {
        if !ontology.add_parent(&parent, &child) {
            debug!("Ignoring is_a {} -> {}: unknown term", child, parent);
        }
    }

    ontology.create_cache();
    debug!("Parsed ontology with {} terms", ontology.len());
    Ok(ontology)
}

/// Splits the content into blocks of non-empty lines
fn stanzas(content: &str) -> Vec<Vec<&str>> {
    let mut res = Vec::new();
    let mut current = Vec::new();
    for line in content.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                res.push(std::mem::take(&mut current));
            }
        } else if line.starts_with('[') && !current.is_empty() {
            res.push(std::mem::replace(&mut current, vec![line]));
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        res.push(current);
    }
    res
}

fn term_from_obo(lines: &[&str]) -> Option<(TermInternal, Vec<TermId>)> {
    let mut id: Option<TermId> = None;
    let mut name: Option<&str> = None;
    let mut definition: Option<&str> = None;
    let mut synonyms: Vec<&str> = Vec::new();
    let mut parents: Vec<TermId> = Vec::new();
    let mut relationships: Vec<(String, TermId)> = Vec::new();
    let mut obsolete = false;

    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            trace!("Ignoring line {}", line);
            continue;
        };
        let value = value.trim();
        match key {
            "id" => id = TermId::try_from(value).ok(),
            "name" => name = Some(value),
            "def" => definition = quoted(value),
            "synonym" => synonyms.extend(quoted(value)),
            "is_a" => match TermId::try_from(strip_comment(value)) {
                Ok(parent) => parents.push(parent),
                Err(_) => warn!("Invalid is_a: {}", value),
            },
            "relationship" => {
                let mut parts = strip_comment(value).split_whitespace();
                match (parts.next(), parts.next().map(TermId::try_from)) {
                    (Some(predicate), Some(Ok(target))) => {
                        relationships.push((predicate.to_string(), target));
                    }
                    _ => warn!("Invalid relationship: {}", value),
                }
            }
            "is_obsolete" => obsolete = value == "true",
            _ => (),
        }
    }

    let mut term = TermInternal::new(id?, name?.to_string());
    if let Some(definition) = definition {
        term.set_definition(definition.to_string());
    }
    for synonym in synonyms {
        term.add_synonym(synonym.to_string());
    }
    for (predicate, target) in relationships {
        term.add_relationship(predicate, target);
    }
    *term.obsolete_mut() = obsolete;
    Some((term, parents))
}

/// Removes a trailing `! comment`
fn strip_comment(value: &str) -> &str {
    value.split_once('!').map_or(value, |(value, _)| value).trim()
}

/// Returns the text between the first pair of unescaped double quotes
fn quoted(value: &str) -> Option<&str> {
    let rest = value.strip_prefix('"')?;
    let mut escaped = false;
    for (idx, c) in rest.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(&rest[..idx]),
            _ => escaped = false,
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::OntologyAccess;

    const SMALL: &str = "format-version: 1.2
data-version: test/2024-01-01

[Term]
id: HP:0000001
name: All

[Term]
id: HP:0000118
name: Phenotypic abnormality
def: \"A phenotypic abnormality.\" [HPO:probinson]
synonym: \"Organ abnormality\" EXACT []
is_a: HP:0000001 ! All

[Term]
id: HP:0000707
name: Abnormality of the nervous system
is_a: HP:0000118 ! Phenotypic abnormality
relationship: part_of UBERON:0001016 ! nervous system
is_a: HP:9999999 ! not part of the file

[Typedef]
id: part_of
name: part of
";

    #[test]
    fn split_terms() {
        let ont = parse_str(SMALL).unwrap();
        assert_eq!(ont.len(), 3);
        assert_eq!(ont.version(), Some("test/2024-01-01"));
        assert_eq!(ont.label("HP:0000707").unwrap(), "Abnormality of the nervous system");
        assert_eq!(ont.ancestors("HP:0000707", false).len(), 2);
        assert_eq!(ont.children("HP:0000001").unwrap().len(), 1);
    }

    #[test]
    fn definitions_and_synonyms() {
        let ont = parse_str(SMALL).unwrap();
        assert_eq!(
            ont.definition("HP:0000118").unwrap(),
            "A phenotypic abnormality."
        );
        assert_eq!(ont.synonyms("HP:0000118"), ["Organ abnormality".to_string()]);
    }

    #[test]
    fn relationships() {
        let ont = parse_str(SMALL).unwrap();
        let rels = ont.outgoing_relationships("HP:0000707");
        assert_eq!(rels.len(), 2);
        assert!(rels
            .iter()
            .any(|(predicate, target)| predicate == "part_of" && target == "UBERON:0001016"));
    }

    #[test]
    fn escaped_quotes() {
        assert_eq!(quoted(r#""a \"b\" c" []"#), Some(r#"a \"b\" c"#));
        assert_eq!(quoted("no quotes"), None);
        assert_eq!(quoted("\"unterminated"), None);
    }

    #[test]
    fn strip_trailing_comment() {
        assert_eq!(strip_comment("HP:0000001 ! All"), "HP:0000001");
        assert_eq!(strip_comment("HP:0000001"), "HP:0000001");
    }

    #[test]
    fn terms_without_name_are_skipped() {
        let ont = parse_str("[Term]\nid: HP:0000001\nname: All\n\n[Term]\nid: HP:0000002\n").unwrap();
        assert_eq!(ont.len(), 1);
    }

    #[test]
    fn empty_content() {
        assert!(matches!(parse_str(""), Err(HpoaError::InvalidInput(_))));
        assert!(matches!(
            parse_str("format-version: 1.2\n\n[Typedef]\nid: part_of\n"),
            Err(HpoaError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            read_obo_file("tests/missing.obo"),
            Err(HpoaError::CannotOpenFile(_))
        ));
    }
}
