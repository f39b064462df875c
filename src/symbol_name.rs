use std::{fmt, sync::Arc};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A C++ identifier derived from a file name.
///
/// This is really just a string, but by making it have an explicit type, only
/// names that went through sanitization can end up in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolName(Arc<str>);

impl SymbolName {
    /// Lower-cases the given name and replaces everything that isn't an ASCII
    /// letter or digit with an underscore.
    ///
    /// - `Hero.png` becomes `hero_png`
    /// - `player-idle` becomes `player_idle`
    /// - `2x_button` is rejected
    pub fn sanitize(name: &str) -> Result<Self, SymbolNameError> {
        lazy_static::lazy_static! {
            static ref NOT_IDENT: Regex = Regex::new(r"[^a-z0-9]").unwrap();
        }

        if name.is_empty() {
            return Err(SymbolNameError::Empty);
        }

        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(SymbolNameError::LeadingDigit {
                name: name.to_owned(),
            });
        }

        let lowered = name.to_lowercase();
        let sanitized = NOT_IDENT.replace_all(&lowered, "_");

        Ok(SymbolName(sanitized.as_ref().into()))
    }

    /// The include guard used for a header whose file stem is `stem`.
    pub fn include_guard(stem: &str) -> Result<String, SymbolNameError> {
        let name = Self::sanitize(stem)?;

        Ok(format!("SILLY_PACKER_GENERATED_{}_H", name.0.to_uppercase()))
    }
}

impl AsRef<str> for SymbolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolName {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolNameError {
    #[error("Cannot build an identifier from an empty file name")]
    Empty,

    #[error("File '{name}' cannot begin with a digit because it is used as a C++ identifier")]
    LeadingDigit { name: String },
}
