//! Decree module - the canonical extracted entity

use crate::amount::Amount;
use std::collections::BTreeSet;

/// Funding source that requires a 10-digit budget classification code
pub const EXCESSO_DE_ARRECADACAO: &str = "Excesso de Arrecadação";

/// Funding source names the oracle normalizes Article 2 into
pub const SOURCE_NAMES: [&str; 4] = [
    "Anulação de Dotações",
    EXCESSO_DE_ARRECADACAO,
    "Superávit Financeiro",
    "Operações de Crédito",
];

/// Additional-credit categories the oracle normalizes Article 1 into
pub const CREDIT_TYPES: [&str; 3] = [
    "Créditos Suplementares",
    "Créditos Especiais",
    "Créditos Extraordinários",
];

/// Structured data extracted from one budget decree
///
/// Normalization of `tipo_credito` and the source names is performed by the
/// oracle; they are carried as reported and not re-validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct DecreeRecord {
    /// Decree identifier, e.g. "13/2023"
    pub numero_decreto: String,

    /// Decree date, free text (no fixed format is guaranteed)
    pub data_decreto: String,

    /// Article 1 credit amount
    pub valor_total: Amount,

    /// Additional-credit category
    pub tipo_credito: String,

    /// Funding sources in Article 2 order
    pub fontes: Vec<FundingSource>,
}

/// One funding source cited in a decree's Article 2
#[derive(Debug, Clone, PartialEq)]
pub struct FundingSource {
    /// Normalized source name
    pub nome_da_fonte: String,

    /// Amount attributed to this source, if itemized
    pub valor_da_fonte: Option<Amount>,

    /// 10-digit code, only ever present on "Excesso de Arrecadação"
    pub codigo_fonte: Option<String>,
}

impl FundingSource {
    /// Create a source with no amount and no code
    pub fn new(nome_da_fonte: impl Into<String>) -> Self {
        Self {
            nome_da_fonte: nome_da_fonte.into(),
            valor_da_fonte: None,
            codigo_fonte: None,
        }
    }

    /// Set the amount attributed to this source
    pub fn with_value(mut self, value: impl Into<Amount>) -> Self {
        self.valor_da_fonte = Some(value.into());
        self
    }

    /// Attach a funding code
    ///
    /// Codes are dropped for every source other than "Excesso de
    /// Arrecadação", so a constructed source always honors the code invariant.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        if self.is_excesso_de_arrecadacao() {
            self.codigo_fonte = Some(code.into());
        }
        self
    }

    /// Whether this is an "Excesso de Arrecadação" source
    pub fn is_excesso_de_arrecadacao(&self) -> bool {
        self.nome_da_fonte == EXCESSO_DE_ARRECADACAO
    }
}

impl DecreeRecord {
    /// Distinct source names, sorted lexicographically
    pub fn distinct_source_names(&self) -> Vec<&str> {
        self.fontes
            .iter()
            .map(|f| f.nome_da_fonte.as_str())
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether the decree cites more than one funding source
    pub fn has_multiple_sources(&self) -> bool {
        self.fontes.len() > 1
    }

    /// Sources named "Excesso de Arrecadação", in Article 2 order
    pub fn excesso_sources(&self) -> impl Iterator<Item = &FundingSource> {
        self.fontes.iter().filter(|f| f.is_excesso_de_arrecadacao())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decree(fontes: Vec<FundingSource>) -> DecreeRecord {
        DecreeRecord {
            numero_decreto: "12/2023".to_string(),
            data_decreto: "01 de Dezembro de 2023".to_string(),
            valor_total: Amount::Number(7176857.26),
            tipo_credito: "Créditos Suplementares".to_string(),
            fontes,
        }
    }

    #[test]
    fn test_distinct_source_names_sorted_and_deduplicated() {
        let record = decree(vec![
            FundingSource::new("Superávit Financeiro"),
            FundingSource::new("Anulação de Dotações"),
            FundingSource::new("Superávit Financeiro"),
        ]);
        assert_eq!(
            record.distinct_source_names(),
            vec!["Anulação de Dotações", "Superávit Financeiro"]
        );
    }

    #[test]
    fn test_code_only_kept_on_excesso() {
        let excesso = FundingSource::new(EXCESSO_DE_ARRECADACAO).with_code("1500000000");
        assert_eq!(excesso.codigo_fonte.as_deref(), Some("1500000000"));

        let anulacao = FundingSource::new("Anulação de Dotações").with_code("1500000000");
        assert_eq!(anulacao.codigo_fonte, None);
    }

    #[test]
    fn test_multiple_sources() {
        assert!(!decree(vec![FundingSource::new("Anulação de Dotações")]).has_multiple_sources());
        assert!(decree(vec![
            FundingSource::new("Anulação de Dotações"),
            FundingSource::new(EXCESSO_DE_ARRECADACAO),
        ])
        .has_multiple_sources());
    }

    #[test]
    fn test_excesso_sources() {
        let record = decree(vec![
            FundingSource::new("Anulação de Dotações"),
            FundingSource::new(EXCESSO_DE_ARRECADACAO).with_code("1500000000"),
        ]);
        let excesso: Vec<_> = record.excesso_sources().collect();
        assert_eq!(excesso.len(), 1);
        assert_eq!(excesso[0].codigo_fonte.as_deref(), Some("1500000000"));
    }
}
