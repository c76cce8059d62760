//! Pre-serialized JSON fragments.

use alloc::boxed::Box;

/// A caller-asserted slice of already-valid JSON, spliced into the output
/// verbatim. The encoder never validates it; a malformed fragment is a
/// caller bug, not an [`crate::EncodeError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(pub Box<[u8]>);

impl Fragment {
    #[must_use]
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(bytes.into())
    }
}

impl From<&[u8]> for Fragment {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }
}
