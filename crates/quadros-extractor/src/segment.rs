//! Splitting a decree corpus into candidate fragments

use crate::error::ExtractorError;
use quadros_domain::Fragment;
use regex::Regex;
use tracing::{debug, info};

/// Decree header: "DECRETO", an optional qualifier word ("Orçamentário",
/// "Municipal", ...), then "Nº"/"N°" with an optional period, at line start.
/// Any Unicode whitespace separates the words, including NBSP and line breaks
/// left behind by PDF extraction.
const HEADER_PATTERN: &str = r"(?im)^DECRETO(?:\s+\p{L}+)?\s+N[º°]\.?";

const ARTICLE_1_PATTERN: &str = r"(?i)Art\.\s*1[º°o]";
const ARTICLE_2_PATTERN: &str = r"(?i)Art\.\s*2[º°o]";

/// Splits a corpus of concatenated decrees into fragments
pub struct Segmenter {
    header: Regex,
    article_1: Regex,
    article_2: Regex,
}

impl Segmenter {
    /// Create a new segmenter
    pub fn new() -> Result<Self, ExtractorError> {
        Ok(Self {
            header: Regex::new(HEADER_PATTERN)?,
            article_1: Regex::new(ARTICLE_1_PATTERN)?,
            article_2: Regex::new(ARTICLE_2_PATTERN)?,
        })
    }

    /// Split the corpus and keep only admissible fragments, in document order
    pub fn segment(&self, corpus: &str) -> Vec<Fragment> {
        let candidates = self.split(corpus);
        let total = candidates.len();

        let admissible: Vec<Fragment> = candidates
            .into_iter()
            .filter(|fragment| {
                let keep = self.is_admissible(&fragment.text);
                if !keep {
                    debug!(
                        ordinal = fragment.ordinal,
                        "Discarding fragment without Art. 1º and Art. 2º markers"
                    );
                }
                keep
            })
            .collect();

        info!(
            "Split corpus into {} blocks, {} admissible",
            total,
            admissible.len()
        );

        admissible
    }

    /// Split the corpus at every decree header, without filtering
    ///
    /// Text before the first header is kept as a fragment unless it is blank.
    /// Concatenating the fragments (plus a dropped blank prefix) gives back
    /// the corpus.
    pub fn split(&self, corpus: &str) -> Vec<Fragment> {
        let mut bounds: Vec<usize> = self.header.find_iter(corpus).map(|m| m.start()).collect();
        if bounds.first() != Some(&0) {
            bounds.insert(0, 0);
        }
        bounds.push(corpus.len());

        let mut fragments = Vec::with_capacity(bounds.len());
        for (idx, window) in bounds.windows(2).enumerate() {
            let text = &corpus[window[0]..window[1]];
            if idx == 0 && text.trim().is_empty() {
                continue;
            }
            fragments.push(Fragment::new(fragments.len() + 1, text));
        }

        fragments
    }

    /// Whether a fragment carries both the Article 1 and Article 2 markers
    pub fn is_admissible(&self, text: &str) -> bool {
        self.article_1.is_match(text) && self.article_2.is_match(text)
    }
}
