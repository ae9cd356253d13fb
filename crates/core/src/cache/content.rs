//! Page content model.

use serde::{Deserialize, Serialize};

/// Content of a downloaded page.
///
/// Pages whose declared charset decodes cleanly are held as text; bodies
/// that fail to decode are kept as the raw bytes, unmodified. The split
/// records how the body was decoded, not what it contains, so equality is
/// byte equality.
#[derive(Debug, Clone)]
pub enum PageContent {
    /// Body decoded to UTF-8 text.
    Text(String),
    /// Body kept as raw bytes.
    Raw(Vec<u8>),
}

impl PageContent {
    /// Rebuild content from stored bytes. Valid UTF-8 reads back as text.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => PageContent::Text(text),
            Err(err) => PageContent::Raw(err.into_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PageContent::Text(text) => text.as_bytes(),
            PageContent::Raw(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            PageContent::Text(text) => text.into_bytes(),
            PageContent::Raw(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PageContent::Text(text) => Some(text),
            PageContent::Raw(_) => None,
        }
    }
}

impl PartialEq for PageContent {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for PageContent {}

impl From<&str> for PageContent {
    fn from(text: &str) -> Self {
        PageContent::Text(text.to_string())
    }
}

/// Temp-tier record: content demoted out of the primary store, stamped with
/// the demotion time in Unix seconds.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TempEntry {
    pub stamped_at: i64,
    pub content: Vec<u8>,
}
