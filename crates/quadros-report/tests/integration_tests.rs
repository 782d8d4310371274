//! Integration tests for quadros-report
//!
//! These tests check the report invariants over full outcome sequences and
//! the files written for them.

use quadros_domain::{
    Amount, DecreeRecord, ExtractionOutcome, ExtractionResult, FundingSource,
    EXCESSO_DE_ARRECADACAO,
};
use quadros_report::{
    reconcile, ReportWriter, CODE_NOT_FOUND, COL_CODIGO, COL_FONTE, COL_NUMERO,
};
use std::fs;
use tempfile::TempDir;

fn decree(numero: &str, valor: Amount, fontes: Vec<FundingSource>) -> DecreeRecord {
    DecreeRecord {
        numero_decreto: numero.to_string(),
        data_decreto: "28 de Dezembro de 2023".to_string(),
        valor_total: valor,
        tipo_credito: "Créditos Suplementares".to_string(),
        fontes,
    }
}

fn sample_outcomes() -> Vec<ExtractionOutcome> {
    vec![
        ExtractionOutcome::new(
            1,
            ExtractionResult::Success(vec![decree(
                "13/2023",
                Amount::from("2.041.680,00"),
                vec![FundingSource::new("Anulação de Dotações").with_value("2.041.680,00")],
            )]),
        ),
        ExtractionOutcome::new(
            2,
            ExtractionResult::TransportFailure("connection reset".to_string()),
        ),
        ExtractionOutcome::new(
            3,
            ExtractionResult::Success(vec![decree(
                "14/2023",
                Amount::Number(1884373.3),
                vec![
                    FundingSource::new("Superávit Financeiro").with_value(884373.3),
                    FundingSource::new(EXCESSO_DE_ARRECADACAO)
                        .with_value(1000000.0)
                        .with_code("1500000000"),
                    FundingSource::new(EXCESSO_DE_ARRECADACAO).with_value(0.0),
                ],
            )]),
        ),
    ]
}

#[test]
fn test_reconcile_is_idempotent() {
    let outcomes = sample_outcomes();
    assert_eq!(reconcile(&outcomes), reconcile(&outcomes));
}

#[test]
fn test_emitted_files_are_byte_identical_across_runs() {
    let outcomes = sample_outcomes();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    let first_paths = ReportWriter::new(first.path()).emit_all(&reconcile(&outcomes)).unwrap();
    let second_paths = ReportWriter::new(second.path()).emit_all(&reconcile(&outcomes)).unwrap();

    for (a, b) in first_paths.iter().zip(&second_paths) {
        assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
    }
}

#[test]
fn test_table_two_rows_match_source_count() {
    let reports = reconcile(&sample_outcomes());

    // 13/2023 has one source, 14/2023 has three
    assert_eq!(reports.by_source.len(), 3);
    assert!(reports
        .by_source
        .column_values(COL_NUMERO)
        .iter()
        .all(|n| *n == "14/2023"));
}

#[test]
fn test_table_three_codes_never_empty() {
    let reports = reconcile(&sample_outcomes());

    let codes = reports.funding_codes.column_values(COL_CODIGO);
    assert_eq!(codes, vec!["1500000000", CODE_NOT_FOUND]);
    assert!(codes.iter().all(|c| !c.is_empty()));
}

#[test]
fn test_table_one_sources_sorted_without_duplicates() {
    let reports = reconcile(&sample_outcomes());

    for cell in reports.summary.column_values(COL_FONTE) {
        let names: Vec<&str> = cell.split(", ").collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }
    assert_eq!(
        reports.summary.column_values(COL_FONTE)[1],
        "Excesso de Arrecadação, Superávit Financeiro"
    );
}

#[test]
fn test_emit_all_writes_three_prefixed_files() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("nested").join("reports");

    let paths = ReportWriter::new(&out)
        .with_prefix("municipio_")
        .emit_all(&reconcile(&sample_outcomes()))
        .unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["municipio_quadro1.csv", "municipio_quadro2.csv", "municipio_quadro3.csv"]
    );

    let quadro1 = fs::read_to_string(&paths[0]).unwrap();
    let mut lines = quadro1.trim_start_matches('\u{feff}').lines();
    assert_eq!(
        lines.next(),
        Some("número do decreto;data do decreto;valor do decreto;Tipo de Crédito Adicional;fonte de recurso do crédito adicional")
    );
    assert_eq!(
        lines.next(),
        Some("13/2023;28 de Dezembro de 2023;2.041.680,00;Créditos Suplementares;Anulação de Dotações")
    );
    assert_eq!(
        lines.next(),
        Some("14/2023;28 de Dezembro de 2023;1.884.373,30;Créditos Suplementares;Excesso de Arrecadação, Superávit Financeiro")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn test_empty_run_still_writes_headers() {
    let dir = TempDir::new().unwrap();
    let paths = ReportWriter::new(dir.path()).emit_all(&reconcile(&[])).unwrap();

    let quadro3 = fs::read_to_string(&paths[2]).unwrap();
    assert_eq!(
        quadro3.trim_start_matches('\u{feff}').trim_end(),
        "número do decreto;data do decreto;fonte de recurso do crédito adicional;código da fonte"
    );
}
