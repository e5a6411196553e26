//! Sorts of the string theory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sort {
    /// Booleans
    Bool,
    /// Mathematical integers
    Int,
    /// Strings over the SMT-LIB alphabet
    String,
    /// Regular languages over strings
    RegLan,
}

impl Sort {
    /// SMT-LIB name of the sort.
    pub fn name(self) -> &'static str {
        match self {
            Sort::Bool => "Bool",
            Sort::Int => "Int",
            Sort::String => "String",
            Sort::RegLan => "RegLan",
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
