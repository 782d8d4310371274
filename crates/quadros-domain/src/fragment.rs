//! Fragment module - one candidate decree cut from the corpus

/// A contiguous slice of the input corpus believed to contain one decree
///
/// Fragments are created by the segmenter and consumed once by the
/// extraction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// 1-based position of the fragment in the split corpus
    ///
    /// Assigned at split time, so fragments discarded by the admissibility
    /// filter leave gaps in the sequence.
    pub ordinal: usize,

    /// Raw text of the fragment, verbatim from the corpus
    pub text: String,
}

impl Fragment {
    /// Create a new fragment
    pub fn new(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }

    /// Length of the fragment text in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the fragment has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_creation() {
        let fragment = Fragment::new(3, "DECRETO Nº 13/2023");
        assert_eq!(fragment.ordinal, 3);
        assert_eq!(fragment.len(), "DECRETO Nº 13/2023".len());
        assert!(!fragment.is_empty());
    }
}
