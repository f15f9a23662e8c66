//! Immutable OCR text buffer.
//!
//! `OcrText` is what the capture pipeline hands the engine: the raw recognized
//! string, fixed once built. Cloning shares the underlying buffer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Raw recognized text, immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OcrText(Arc<str>);

impl OcrText {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length in bytes. This is the length completeness scoring uses.
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Cleanup applied before citation pattern matching.
    ///
    /// Uppercases, drops spaces, reads `|` as `I`, then keeps only alphanumerics.
    /// `0` and `O` are left alone: swapping them corrupts numeric citations.
    pub fn normalized(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        for ch in self.0.chars().flat_map(char::to_uppercase) {
            let ch = if ch == '|' { 'I' } else { ch };
            if ch.is_alphanumeric() {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Display for OcrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OcrText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for OcrText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for OcrText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
