//! Quadros Extractor
//!
//! Cuts a decree corpus into fragments and turns each fragment into
//! structured decree records with one LLM call.
//!
//! # Architecture
//!
//! ```text
//! Corpus → Segmenter → Fragments → Extractor → LLM → ExtractionOutcomes
//! ```
//!
//! # Key Features
//!
//! - **Segmentation**: split on `DECRETO Nº` headers and keep only fragments
//!   with both Article 1 and Article 2
//! - **Prompting**: one self-contained prompt per fragment
//! - **Schema normalization**: the `decretos` and `quadro1..3` reply shapes
//!   both decode to `DecreeRecord`s
//! - **Bounded concurrency**: timeouts and retries per call, output in
//!   fragment order
//! - **Graceful stop**: a `StopHandle` halts submission while in-flight calls
//!   run to completion or timeout
//!
//! # Example Usage
//!
//! ```no_run
//! use quadros_extractor::{Extractor, ExtractorConfig, Segmenter};
//! use quadros_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let segmenter = Segmenter::new()?;
//! let fragments = segmenter.segment("DECRETO Nº 1/2023 ... Art. 1º ... Art. 2º ...");
//!
//! let llm = MockProvider::new(r#"{"decretos": []}"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let run = extractor.extract_all(fragments).await;
//! println!("{} fragments, {} failed", run.progress.total, run.progress.failed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod segment;
mod types;


pub use config::{ExtractorConfig, ResponseSchema};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use parser::{parse_llm_response, ParseOptions};
pub use prompt::PromptBuilder;
pub use segment::Segmenter;
pub use types::{ExtractionMetadata, ExtractionProgress, ExtractionRun, StopHandle};
