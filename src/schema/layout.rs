use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants::{
    LONG_EXTENSION, PRECURSOR_STORAGE_PER_SCAN, PRECURSOR_STORAGE_REPEATED, WIDE_EXTENSION,
};

/// Physical layout of a container, chosen at write time and recorded in the
/// footer under [`KEY_LAYOUT`](super::KEY_LAYOUT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One row per peak; scan metadata repeated on every row of the scan
    #[default]
    Long,
    /// One row per scan; peaks stored as list columns
    Wide,
}

impl Layout {
    /// Tag written to the footer
    pub fn tag(self) -> &'static str {
        match self {
            Layout::Long => "long",
            Layout::Wide => "wide",
        }
    }

    /// Parse a footer tag. Unknown tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "long" => Some(Layout::Long),
            "wide" => Some(Layout::Wide),
            _ => None,
        }
    }

    /// Conventional file extension (without the dot)
    pub fn extension(self) -> &'static str {
        match self {
            Layout::Long => LONG_EXTENSION,
            Layout::Wide => WIDE_EXTENSION,
        }
    }

    /// Value of the precursor storage footer key
    pub fn precursor_storage(self) -> &'static str {
        match self {
            Layout::Long => PRECURSOR_STORAGE_REPEATED,
            Layout::Wide => PRECURSOR_STORAGE_PER_SCAN,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layout::from_tag(&s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown layout '{}': expected 'long' or 'wide'", s))
    }
}
