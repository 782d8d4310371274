//! Quadros Report
//!
//! Reconciles extraction outcomes into the three additional-credit tables
//! and writes them as CSV.
//!
//! ```text
//! ExtractionOutcomes → reconcile → Reports → ReportWriter → quadro{1,2,3}.csv
//! ```
//!
//! - **quadro1**: one row per decree
//! - **quadro2**: one row per funding source, for decrees with several sources
//! - **quadro3**: one row per "Excesso de Arrecadação" source with its code

#![warn(missing_docs)]

mod emit;
mod error;
pub mod money;
mod reconcile;
mod table;

pub use emit::ReportWriter;
pub use error::ReportError;
pub use money::{format_brl, format_brl_str};
pub use reconcile::{
    reconcile, Reports, CODE_NOT_FOUND, COL_CODIGO, COL_DATA, COL_FONTE, COL_NUMERO,
    COL_TIPO_CREDITO, COL_VALOR_DECRETO, COL_VALOR_FONTE,
};
pub use table::{Row, Table};
