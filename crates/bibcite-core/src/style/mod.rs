//! Citation styles
//!
//! Styles are identified by a closed set of ids and resolved through the
//! registry to immutable [`StyleDefinition`] tables.

pub mod definition;
pub mod registry;

pub use definition::*;
pub use registry::{
    lookup, style, APA7, CHICAGO17, HARVARD, IEEE, MLA9, NATURE, OXFORD, SCIENCE, TURABIAN,
    VANCOUVER,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Identifier of a built-in citation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleId {
    Apa7,
    Mla9,
    Chicago17,
    Harvard,
    Vancouver,
    Ieee,
    Nature,
    Science,
    Oxford,
    Turabian,
}

impl StyleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apa7 => "apa7",
            Self::Mla9 => "mla9",
            Self::Chicago17 => "chicago17",
            Self::Harvard => "harvard",
            Self::Vancouver => "vancouver",
            Self::Ieee => "ieee",
            Self::Nature => "nature",
            Self::Science => "science",
            Self::Oxford => "oxford",
            Self::Turabian => "turabian",
        }
    }

    pub fn all() -> &'static [StyleId] {
        &[
            Self::Apa7,
            Self::Mla9,
            Self::Chicago17,
            Self::Harvard,
            Self::Vancouver,
            Self::Ieee,
            Self::Nature,
            Self::Science,
            Self::Oxford,
            Self::Turabian,
        ]
    }

    /// The style's definition table
    pub fn definition(&self) -> &'static StyleDefinition {
        registry::style(*self)
    }
}

impl FromStr for StyleId {
    type Err = ConfigurationError;

    /// Style ids are matched exactly after trimming and lowercasing
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| ConfigurationError::UnknownStyle(s.to_string()))
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ids() {
        for id in StyleId::all() {
            assert_eq!(id.as_str().parse::<StyleId>().unwrap(), *id);
        }
        assert_eq!(" APA7 ".parse::<StyleId>().unwrap(), StyleId::Apa7);
    }

    #[test]
    fn test_unknown_id_is_configuration_error() {
        assert_eq!(
            "apa6".parse::<StyleId>(),
            Err(ConfigurationError::UnknownStyle("apa6".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_ids() {
        let json = serde_json::to_string(&StyleId::Chicago17).unwrap();
        assert_eq!(json, "\"chicago17\"");
        let id: StyleId = serde_json::from_str("\"ieee\"").unwrap();
        assert_eq!(id, StyleId::Ieee);
    }
}
