use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotations::RowError;

/// Whether the phenotype is asserted for the disease or explicitly excluded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Qualifier {
    /// The disease is characterized by the phenotype (empty column)
    #[default]
    #[serde(rename = "")]
    Asserted,
    /// The disease is explicitly **not** characterized by the phenotype
    #[serde(rename = "NOT")]
    Not,
}

impl FromStr for Qualifier {
    type Err = RowError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Qualifier::Asserted),
            "NOT" => Ok(Qualifier::Not),
            _ => Err(RowError::InvalidValue("qualifier", s.to_string())),
        }
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Qualifier::Asserted => Ok(()),
            Qualifier::Not => f.write_str("NOT"),
        }
    }
}

/// Evidence code of an annotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Evidence {
    /// Inferred from electronic annotation, extracted from OMIM
    IEA,
    /// Published clinical study
    PCS,
    /// Traceable author statement, e.g. from OMIM or Orphanet
    TAS,
}

impl FromStr for Evidence {
    type Err = RowError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IEA" => Ok(Evidence::IEA),
            "PCS" => Ok(Evidence::PCS),
            "TAS" => Ok(Evidence::TAS),
            _ => Err(RowError::InvalidValue("evidence", s.to_string())),
        }
    }
}

impl Display for Evidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Evidence::IEA => "IEA",
            Evidence::PCS => "PCS",
            Evidence::TAS => "TAS",
        };
        f.write_str(code)
    }
}

/// Phenotypic sex an annotation is limited to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Not limited to one sex (empty column)
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "MALE")]
    Male,
    #[serde(rename = "FEMALE")]
    Female,
}

impl FromStr for Sex {
    type Err = RowError;
    /// Older releases use lower case values, so parsing ignores case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Ok(Sex::Unspecified)
        } else if s.eq_ignore_ascii_case("MALE") {
            Ok(Sex::Male)
        } else if s.eq_ignore_ascii_case("FEMALE") {
            Ok(Sex::Female)
        } else {
            Err(RowError::InvalidValue("sex", s.to_string()))
        }
    }
}

impl Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Unspecified => Ok(()),
            Sex::Male => f.write_str("MALE"),
            Sex::Female => f.write_str("FEMALE"),
        }
    }
}

/// The HPO sub-ontology the annotated term belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    /// Phenotypic abnormality
    P,
    /// Mode of inheritance
    I,
    /// Clinical course, e.g. onset and mortality
    C,
    /// Clinical modifier
    M,
}

impl FromStr for Aspect {
    type Err = RowError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P" => Ok(Aspect::P),
            "I" => Ok(Aspect::I),
            "C" => Ok(Aspect::C),
            "M" => Ok(Aspect::M),
            _ => Err(RowError::InvalidValue("aspect", s.to_string())),
        }
    }
}

impl Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Aspect::P => "P",
            Aspect::I => "I",
            Aspect::C => "C",
            Aspect::M => "M",
        };
        f.write_str(code)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn qualifier() {
        assert_eq!("".parse::<Qualifier>().unwrap(), Qualifier::Asserted);
        assert_eq!("NOT".parse::<Qualifier>().unwrap(), Qualifier::Not);
        assert!("not".parse::<Qualifier>().is_err());
        assert_eq!(Qualifier::Asserted.to_string(), "");
    }

    #[test]
    fn evidence() {
        assert_eq!("PCS".parse::<Evidence>().unwrap(), Evidence::PCS);
        assert!("ICE".parse::<Evidence>().is_err());
        assert!("".parse::<Evidence>().is_err());
    }

    #[test]
    fn sex_ignores_case() {
        assert_eq!("female".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!("MALE".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("".parse::<Sex>().unwrap(), Sex::Unspecified);
        assert!("both".parse::<Sex>().is_err());
        assert_eq!(Sex::Female.to_string(), "FEMALE");
    }

    #[test]
    fn aspect() {
        for code in ["P", "I", "C", "M"] {
            assert_eq!(code.parse::<Aspect>().unwrap().to_string(), code);
        }
        assert!("X".parse::<Aspect>().is_err());
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&Qualifier::Asserted).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Qualifier::Not).unwrap(), "\"NOT\"");
        assert_eq!(serde_json::to_string(&Sex::Male).unwrap(), "\"MALE\"");
        assert_eq!(serde_json::to_string(&Evidence::IEA).unwrap(), "\"IEA\"");
    }
}
