// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! RDF term values

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Well-known IRIs used by the optimizer and the closure engine
pub mod vocab {
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const XSD_LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
    pub const XSD_INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    pub(crate) const NUMERIC_DATATYPES: [&str; 6] =
        [XSD_INTEGER, XSD_DECIMAL, XSD_DOUBLE, XSD_FLOAT, XSD_LONG, XSD_INT];
}

/// An RDF term: the value occupying a subject, predicate or object position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// An IRI reference
    Iri(String),
    /// A blank node with its local label
    BlankNode(String),
    /// A literal with optional datatype IRI or language tag
    Literal {
        lexical: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    /// Plain literal without datatype or language
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn lang_literal(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    /// xsd:integer literal
    pub fn integer(value: i64) -> Self {
        Self::typed_literal(value.to_string(), vocab::XSD_INTEGER)
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Numeric value of a literal carrying one of the XSD numeric datatypes
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Term::Literal {
                lexical,
                datatype: Some(datatype),
                ..
            } if vocab::NUMERIC_DATATYPES.contains(&datatype.as_str()) => {
                lexical.trim().parse::<f64>().ok()
            }
            _ => None,
        }
    }

    /// Total order used for ORDER BY style comparisons.
    ///
    /// Blank nodes sort before IRIs, IRIs before literals. Two numeric
    /// literals compare by value; other literals compare by lexical form,
    /// then datatype, then language tag.
    pub fn sort_cmp(&self, other: &Term) -> Ordering {
        fn rank(term: &Term) -> u8 {
            match term {
                Term::BlankNode(_) => 0,
                Term::Iri(_) => 1,
                Term::Literal { .. } => 2,
            }
        }

        match (self, other) {
            (Term::BlankNode(a), Term::BlankNode(b)) => a.cmp(b),
            (Term::Iri(a), Term::Iri(b)) => a.cmp(b),
            (
                Term::Literal {
                    lexical: la,
                    datatype: da,
                    language: ga,
                },
                Term::Literal {
                    lexical: lb,
                    datatype: db,
                    language: gb,
                },
            ) => {
                if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
                    if let Some(ordering) = a.partial_cmp(&b) {
                        if ordering != Ordering::Equal {
                            return ordering;
                        }
                    }
                }
                la.cmp(lb).then_with(|| da.cmp(db)).then_with(|| ga.cmp(gb))
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(label) => write!(f, "_:{}", label),
            Term::Literal {
                lexical,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", lexical)?;
                if let Some(language) = language {
                    write!(f, "@{}", language)
                } else if let Some(datatype) = datatype {
                    write!(f, "^^<{}>", datatype)
                } else {
                    Ok(())
                }
            }
        }
    }
}
