//! Quadros Domain Layer
//!
//! Core model for extracting additional-credit data from Brazilian municipal
//! budget decrees. This crate has no external dependencies and defines the
//! value objects and trait interfaces the other crates build on.
//!
//! ## Key Concepts
//!
//! - **Fragment**: one candidate decree's worth of raw text, cut from the corpus
//! - **DecreeRecord**: the structured data extracted from one decree
//! - **FundingSource**: one funding source cited in a decree's Article 2
//! - **ExtractionResult**: the tagged outcome of asking the oracle about a fragment
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Infrastructure (HTTP providers, CSV output) lives in other crates
//! - Trait definitions for the oracle boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod amount;
pub mod decree;
pub mod extraction;
pub mod fragment;
pub mod traits;

// Re-exports for convenience
pub use amount::Amount;
pub use decree::{DecreeRecord, FundingSource, CREDIT_TYPES, EXCESSO_DE_ARRECADACAO, SOURCE_NAMES};
pub use extraction::{ExtractionOutcome, ExtractionResult};
pub use fragment::Fragment;
