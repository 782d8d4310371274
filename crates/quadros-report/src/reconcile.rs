//! Turning extraction outcomes into the three report tables

use crate::money::format_brl;
use crate::table::Table;
use quadros_domain::{DecreeRecord, ExtractionOutcome, ExtractionResult};
use tracing::debug;

/// Column: decree number
pub const COL_NUMERO: &str = "número do decreto";
/// Column: decree date
pub const COL_DATA: &str = "data do decreto";
/// Column: decree total
pub const COL_VALOR_DECRETO: &str = "valor do decreto";
/// Column: credit type
pub const COL_TIPO_CREDITO: &str = "Tipo de Crédito Adicional";
/// Column: funding source name(s)
pub const COL_FONTE: &str = "fonte de recurso do crédito adicional";
/// Column: per-source amount
pub const COL_VALOR_FONTE: &str = "valor do crédito adicional para cada fonte de recurso";
/// Column: funding code
pub const COL_CODIGO: &str = "código da fonte";

/// Cell value for an Excesso de Arrecadação source without a code
pub const CODE_NOT_FOUND: &str = "Não encontrado";

/// The three report tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reports {
    /// Quadro 1: one row per decree
    pub summary: Table,
    /// Quadro 2: one row per source, for decrees with several sources
    pub by_source: Table,
    /// Quadro 3: one row per Excesso de Arrecadação source
    pub funding_codes: Table,
}

impl Reports {
    fn empty() -> Self {
        Self {
            summary: Table::new(
                "quadro1",
                &[COL_NUMERO, COL_DATA, COL_VALOR_DECRETO, COL_TIPO_CREDITO, COL_FONTE],
            ),
            by_source: Table::new("quadro2", &[COL_NUMERO, COL_DATA, COL_VALOR_FONTE, COL_FONTE]),
            funding_codes: Table::new("quadro3", &[COL_NUMERO, COL_DATA, COL_FONTE, COL_CODIGO]),
        }
    }

    /// All tables in output order
    pub fn tables(&self) -> [&Table; 3] {
        [&self.summary, &self.by_source, &self.funding_codes]
    }

    fn add_record(&mut self, record: &DecreeRecord) {
        self.summary.push_row([
            (COL_NUMERO, record.numero_decreto.clone()),
            (COL_DATA, record.data_decreto.clone()),
            (COL_VALOR_DECRETO, format_brl(&record.valor_total)),
            (COL_TIPO_CREDITO, record.tipo_credito.clone()),
            (COL_FONTE, record.distinct_source_names().join(", ")),
        ]);

        if record.has_multiple_sources() {
            for fonte in &record.fontes {
                self.by_source.push_row([
                    (COL_NUMERO, record.numero_decreto.clone()),
                    (COL_DATA, record.data_decreto.clone()),
                    (
                        COL_VALOR_FONTE,
                        fonte.valor_da_fonte.as_ref().map(format_brl).unwrap_or_default(),
                    ),
                    (COL_FONTE, fonte.nome_da_fonte.clone()),
                ]);
            }
        }

        for fonte in record.excesso_sources() {
            self.funding_codes.push_row([
                (COL_NUMERO, record.numero_decreto.clone()),
                (COL_DATA, record.data_decreto.clone()),
                (COL_FONTE, fonte.nome_da_fonte.clone()),
                (
                    COL_CODIGO,
                    fonte
                        .codigo_fonte
                        .clone()
                        .unwrap_or_else(|| CODE_NOT_FOUND.to_string()),
                ),
            ]);
        }
    }
}

/// Build the report tables from extraction outcomes
///
/// Outcomes are taken in ordinal order. Failed outcomes add no rows; the
/// extractor already reported them, so they are only traced at debug level
/// here. The same input always yields the same tables.
pub fn reconcile(outcomes: &[ExtractionOutcome]) -> Reports {
    let mut ordered: Vec<&ExtractionOutcome> = outcomes.iter().collect();
    ordered.sort_by_key(|outcome| outcome.ordinal);

    let mut reports = Reports::empty();

    for outcome in ordered {
        match &outcome.result {
            ExtractionResult::Success(records) => {
                for record in records {
                    reports.add_record(record);
                }
            }
            ExtractionResult::MalformedResponse { reason, .. } => {
                debug!(fragment = outcome.ordinal, "Skipping malformed extraction: {}", reason);
            }
            ExtractionResult::TransportFailure(reason) => {
                debug!(fragment = outcome.ordinal, "Skipping failed extraction: {}", reason);
            }
        }
    }

    debug!(
        quadro1 = reports.summary.len(),
        quadro2 = reports.by_source.len(),
        quadro3 = reports.funding_codes.len(),
        "Reconciled reports"
    );

    reports
}
