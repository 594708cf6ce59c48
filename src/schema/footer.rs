use serde::{Deserialize, Serialize};

use super::constants::{
    CONVERTER_NAME, CONVERTER_VERSION, KEY_CONVERTER_INFO, KEY_FORMAT_VERSION, KEY_LAYOUT,
    KEY_PRECURSOR_STORAGE, MZPARQUET_FORMAT_VERSION,
};
use super::layout::Layout;

/// Software that wrote a container, stored as JSON under [`KEY_CONVERTER_INFO`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterInfo {
    pub name: String,
    pub version: String,
}

impl ConverterInfo {
    /// This crate
    pub fn current() -> Self {
        Self {
            name: CONVERTER_NAME.to_string(),
            version: CONVERTER_VERSION.to_string(),
        }
    }
}

/// Footer key-value pairs of a container, in a fixed order.
///
/// Nothing time- or host-dependent is included, so identical inputs produce
/// identical footers.
pub fn footer_metadata(layout: Layout) -> Result<Vec<(String, String)>, serde_json::Error> {
    Ok(vec![
        (
            KEY_FORMAT_VERSION.to_string(),
            MZPARQUET_FORMAT_VERSION.to_string(),
        ),
        (KEY_LAYOUT.to_string(), layout.tag().to_string()),
        (
            KEY_PRECURSOR_STORAGE.to_string(),
            layout.precursor_storage().to_string(),
        ),
        (
            KEY_CONVERTER_INFO.to_string(),
            serde_json::to_string(&ConverterInfo::current())?,
        ),
    ])
}
