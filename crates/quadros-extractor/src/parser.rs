//! Parse LLM output into decree records
//!
//! Each response schema has its own normalization step; whatever the shape,
//! the output is a list of canonical `DecreeRecord`s. A structurally invalid
//! element (not an object, no funding source, a source without a name) rejects
//! the whole reply. Missing or null header fields only cost that cell: they
//! are left empty and logged.

use crate::config::ResponseSchema;
use crate::error::ExtractorError;
use quadros_domain::{Amount, DecreeRecord, FundingSource};
use serde_json::{Map, Value};
use tracing::warn;

/// Placeholders the oracle uses when it cannot find a funding code
const CODE_NOT_FOUND_MARKERS: [&str; 5] = ["não encontrado", "nao encontrado", "n/a", "null", "-"];

/// Options applied while normalizing records
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Response shape to expect
    pub schema: ResponseSchema,
    /// Use the decree total for sources without an itemized value
    pub source_value_fallback: bool,
}

/// Parse an LLM reply into decree records
pub fn parse_llm_response(
    response: &str,
    options: ParseOptions,
) -> Result<Vec<DecreeRecord>, ExtractorError> {
    // LLMs sometimes wrap JSON in markdown code blocks
    let json_str = extract_json(response);

    let json: Value = serde_json::from_str(json_str)?;

    let root = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected a JSON object".to_string()))?;

    let records = match options.schema {
        ResponseSchema::Decretos => parse_decretos(root)?,
        ResponseSchema::Quadros => parse_quadros(root)?,
    };

    Ok(records
        .into_iter()
        .map(|record| finish_record(record, options))
        .collect())
}

/// Extract JSON from response, handling markdown code blocks
pub(crate) fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest)
        .trim_end();

    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Get a required list-valued key from the root object
fn required_list<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a Vec<Value>, ExtractorError> {
    root.get(key)
        .ok_or_else(|| ExtractorError::InvalidFormat(format!("Missing top-level key '{}'", key)))?
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat(format!("Key '{}' is not a list", key)))
}

/// Get an optional list-valued key; `null` counts as absent
fn optional_list<'a>(root: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], ExtractorError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ExtractorError::InvalidFormat(format!(
            "Key '{}' is not a list",
            key
        ))),
    }
}

fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>, ExtractorError> {
    value
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat(format!("{} is not a JSON object", context)))
}

/// First non-blank textual value among `keys`; numbers are rendered as text
fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First monetary value among `keys`
fn amount_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<Amount> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_f64().map(Amount::Number),
        Value::String(s) if !s.trim().is_empty() => Some(Amount::Text(s.trim().to_string())),
        _ => None,
    })
}

/// Funding code, with "not found" placeholders normalized to `None`
fn code_field(obj: &Map<String, Value>) -> Option<String> {
    text_field(obj, &["codigo_fonte"]).filter(|code| {
        let lowered = code.to_lowercase();
        !CODE_NOT_FOUND_MARKERS.contains(&lowered.as_str())
    })
}

fn required_text(
    obj: &Map<String, Value>,
    keys: &[&str],
    context: &str,
) -> Result<String, ExtractorError> {
    text_field(obj, keys).ok_or_else(|| {
        ExtractorError::InvalidFormat(format!("{}: missing or invalid '{}'", context, keys[0]))
    })
}

/// Decree fields shared by every schema, before sources are attached
struct DecreeHeader {
    numero_decreto: String,
    data_decreto: String,
    valor_total: Amount,
    tipo_credito: String,
}

/// Header text field, left empty when the oracle omitted it
fn lenient_text(obj: &Map<String, Value>, key: &str, context: &str) -> String {
    text_field(obj, &[key]).unwrap_or_else(|| {
        warn!(context, field = key, "Missing or null decree field, leaving it empty");
        String::new()
    })
}

fn parse_header(obj: &Map<String, Value>, context: &str) -> DecreeHeader {
    let valor_total = amount_field(obj, &["valor_total", "valor_decreto"]).unwrap_or_else(|| {
        warn!(context, field = "valor_total", "Missing or null decree field, leaving it empty");
        Amount::Text(String::new())
    });

    DecreeHeader {
        numero_decreto: lenient_text(obj, "numero_decreto", context),
        data_decreto: lenient_text(obj, "data_decreto", context),
        valor_total,
        tipo_credito: lenient_text(obj, "tipo_credito", context),
    }
}

impl DecreeHeader {
    fn with_sources(self, fontes: Vec<FundingSource>, context: &str) -> Result<DecreeRecord, ExtractorError> {
        if fontes.is_empty() {
            return Err(ExtractorError::InvalidFormat(format!(
                "{}: no funding source",
                context
            )));
        }
        Ok(DecreeRecord {
            numero_decreto: self.numero_decreto,
            data_decreto: self.data_decreto,
            valor_total: self.valor_total,
            tipo_credito: self.tipo_credito,
            fontes,
        })
    }
}

/// Parse one funding source object (`fontes` element or flat row)
fn parse_source(
    obj: &Map<String, Value>,
    value_keys: &[&str],
    context: &str,
) -> Result<FundingSource, ExtractorError> {
    let nome = required_text(obj, &["nome_da_fonte", "fonte_recurso"], context)?;
    Ok(FundingSource {
        nome_da_fonte: nome,
        valor_da_fonte: amount_field(obj, value_keys),
        codigo_fonte: code_field(obj),
    })
}

/// Parse a nested `fontes` list, if the element has one
fn parse_nested_sources(
    obj: &Map<String, Value>,
    context: &str,
) -> Result<Option<Vec<FundingSource>>, ExtractorError> {
    let Some(value) = obj.get("fontes") else {
        return Ok(None);
    };
    let items = value
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat(format!("{}: 'fontes' is not a list", context)))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let source_context = format!("{} fonte {}", context, idx);
            let source_obj = as_object(item, &source_context)?;
            parse_source(source_obj, &["valor_da_fonte", "valor_decreto"], &source_context)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// `{"decretos": [...]}`: nested `fontes`, or the older flat
/// `fonte_recurso`/`codigo_fonte` element shape
fn parse_decretos(root: &Map<String, Value>) -> Result<Vec<DecreeRecord>, ExtractorError> {
    let items = required_list(root, ResponseSchema::Decretos.required_key())?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let context = format!("decretos[{}]", idx);
            let obj = as_object(item, &context)?;
            let header = parse_header(obj, &context);

            let fontes = match parse_nested_sources(obj, &context)? {
                Some(fontes) => fontes,
                None => vec![parse_source(obj, &["valor_da_fonte"], &context)?],
            };

            header.with_sources(fontes, &context)
        })
        .collect()
}

/// `{"quadro1": [...], "quadro2": [...], "quadro3": [...]}`: one flat list
/// per report, joined back together on `numero_decreto`
fn parse_quadros(root: &Map<String, Value>) -> Result<Vec<DecreeRecord>, ExtractorError> {
    let quadro1 = required_list(root, ResponseSchema::Quadros.required_key())?;
    let quadro2 = rows_of(optional_list(root, "quadro2")?, "quadro2")?;
    let quadro3 = rows_of(optional_list(root, "quadro3")?, "quadro3")?;

    quadro1
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let context = format!("quadro1[{}]", idx);
            let obj = as_object(item, &context)?;
            let header = parse_header(obj, &context);

            let mut fontes = match parse_nested_sources(obj, &context)? {
                Some(fontes) => fontes,
                None => {
                    let detail: Vec<FundingSource> = quadro2
                        .iter()
                        .filter(|row| text_field(row, &["numero_decreto"]).as_deref() == Some(header.numero_decreto.as_str()))
                        .map(|row| parse_source(row, &["valor_decreto", "valor_da_fonte"], "quadro2"))
                        .collect::<Result<_, _>>()?;
                    if detail.is_empty() {
                        vec![parse_source(obj, &["valor_da_fonte"], &context)?]
                    } else {
                        detail
                    }
                }
            };

            // Codes listed in quadro3 fill Excesso sources that lack one
            for fonte in fontes.iter_mut().filter(|f| f.is_excesso_de_arrecadacao() && f.codigo_fonte.is_none()) {
                fonte.codigo_fonte = quadro3
                    .iter()
                    .filter(|row| text_field(row, &["numero_decreto"]).as_deref() == Some(header.numero_decreto.as_str()))
                    .find_map(|row| code_field(row))
                    .or_else(|| code_field(obj));
            }

            header.with_sources(fontes, &context)
        })
        .collect()
}

fn rows_of<'a>(items: &'a [Value], name: &str) -> Result<Vec<&'a Map<String, Value>>, ExtractorError> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| as_object(item, &format!("{}[{}]", name, idx)))
        .collect()
}

/// Apply the value fallback policy and the funding-code invariant
fn finish_record(mut record: DecreeRecord, options: ParseOptions) -> DecreeRecord {
    for fonte in &mut record.fontes {
        if fonte.valor_da_fonte.is_none() && options.source_value_fallback {
            fonte.valor_da_fonte = Some(record.valor_total.clone());
        }

        if fonte.codigo_fonte.is_some() && !fonte.is_excesso_de_arrecadacao() {
            warn!(
                decree = %record.numero_decreto,
                source = %fonte.nome_da_fonte,
                "Dropping funding code attached to a source other than Excesso de Arrecadação"
            );
            fonte.codigo_fonte = None;
        }
    }
    record
}
