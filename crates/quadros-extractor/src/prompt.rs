//! LLM prompt engineering for decree extraction

use crate::config::ResponseSchema;
use quadros_domain::{CREDIT_TYPES, EXCESSO_DE_ARRECADACAO, SOURCE_NAMES};

/// Builds the extraction prompt for one fragment
pub struct PromptBuilder<'a> {
    text: &'a str,
    schema: ResponseSchema,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for the fragment text
    pub fn new(text: &'a str, schema: ResponseSchema) -> Self {
        Self { text, schema }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(self.text.len() + 4_096);

        // 1. Role, selection and interpretation rules
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push('\n');
        prompt.push_str(&interpretation_rules());
        prompt.push_str(FIELD_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. The fragment, verbatim
        prompt.push_str("<texto_decreto>\n");
        prompt.push_str(self.text);
        prompt.push_str("\n</texto_decreto>\n\n");

        // 3. Output contract for the requested schema
        prompt.push_str(match self.schema {
            ResponseSchema::Decretos => DECRETOS_OUTPUT_FORMAT,
            ResponseSchema::Quadros => QUADROS_OUTPUT_FORMAT,
        });

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Você é um assistente especialista em análise de decretos orçamentários municipais.
Analise o texto de um único decreto, delimitado por <texto_decreto>, e extraia suas informações em JSON.
O texto pode conter ruídos de OCR, quebras de página e formatação inconsistente: corrija separações indevidas de palavras e ignore símbolos estranhos.

Critérios de seleção:
- Considere apenas documentos que começam com "DECRETO" seguido de número e data.
- O decreto deve conter obrigatoriamente os Artigos 1º e 2º.
- Ignore documentos que comecem com "LEI", "OFÍCIO" ou "OFICIO". Se o texto não for um decreto válido, retorne a lista vazia."#;

/// Article 1 and Article 2 rules, enumerating the normalized vocabulary
fn interpretation_rules() -> String {
    format!(
        "\nRegras de interpretação:\n\
         - Artigo 1º: contém o valor do crédito adicional. Normalize o tipo de crédito para {} \
         (\"Crédito Suplementar\", \"Crédito Adicional Suplementar\" e \"Suplementar\" são \"{}\").\n\
         - Artigo 2º: indica a fonte de recurso, no caput ou em incisos. Normalize para {} \
         (\"Anulação Parcial\" e \"Anulações Parciais das Dotações Orçamentárias\" são \"{}\").\n\
         - Se o Artigo 2º tiver incisos com valores, cada inciso é uma fonte separada; se houver apenas o caput, há uma única fonte.\n\
         - Para \"{}\", extraia o código de fonte de 10 dígitos (PORTARIA Nº 710/2021). \
         Para as demais fontes, o código é null. Se o código não for encontrado, use null.\n\n",
        quoted_alternatives(&CREDIT_TYPES),
        CREDIT_TYPES[0],
        quoted_alternatives(&SOURCE_NAMES),
        SOURCE_NAMES[0],
        EXCESSO_DE_ARRECADACAO,
    )
}

/// `"a", "b" ou "c"`
fn quoted_alternatives(values: &[&str]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} ou {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

const FIELD_INSTRUCTIONS: &str = r#"Campos:
- "numero_decreto": número e ano do decreto (ex.: "13/2023").
- "data_decreto": data do decreto (ex.: "28 de Dezembro de 2023").
- "valor_total": valor do crédito do Artigo 1º, como número float com ponto decimal (ex.: 1884373.30).
- "tipo_credito": tipo de crédito normalizado.
- "nome_da_fonte": fonte de recurso normalizada.
- "valor_da_fonte": valor da fonte, se detalhado no Artigo 2º (float); caso contrário, null.
- "codigo_fonte": código de 10 dígitos ou null."#;

const DECRETOS_OUTPUT_FORMAT: &str = r#"Formato de saída (SOMENTE um objeto JSON válido, sem texto adicional):
{
  "decretos": [
    {
      "numero_decreto": "12/2023",
      "data_decreto": "01 de Dezembro de 2023",
      "valor_total": 7176857.26,
      "tipo_credito": "Créditos Suplementares",
      "fontes": [
        {"nome_da_fonte": "Anulação de Dotações", "valor_da_fonte": 4942314.23, "codigo_fonte": null},
        {"nome_da_fonte": "Superávit Financeiro", "valor_da_fonte": 2234543.03, "codigo_fonte": null}
      ]
    }
  ]
}

A lista "fontes" segue a ordem de aparição no Artigo 2º."#;

const QUADROS_OUTPUT_FORMAT: &str = r#"Formato de saída (SOMENTE um objeto JSON válido, sem texto adicional), com as chaves "quadro1", "quadro2" e "quadro3":
{
  "quadro1": [
    {"numero_decreto": "12/2023", "data_decreto": "01 de Dezembro de 2023", "valor_total": 7176857.26,
     "tipo_credito": "Créditos Suplementares", "fonte_recurso": "Anulação de Dotações", "codigo_fonte": null}
  ],
  "quadro2": [
    {"numero_decreto": "12/2023", "data_decreto": "01 de Dezembro de 2023", "valor_decreto": 4942314.23, "fonte_recurso": "Anulação de Dotações"},
    {"numero_decreto": "12/2023", "data_decreto": "01 de Dezembro de 2023", "valor_decreto": 2234543.03, "fonte_recurso": "Superávit Financeiro"}
  ],
  "quadro3": [
    {"numero_decreto": "12/2023", "data_decreto": "01 de Dezembro de 2023", "fonte_recurso": "Excesso de Arrecadação", "codigo_fonte": "1500000000"}
  ]
}

- "quadro1": uma linha por decreto.
- "quadro2": uma linha por fonte de recurso citada no Artigo 2º.
- "quadro3": somente as fontes "Excesso de Arrecadação", com o código de 10 dígitos."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text_verbatim() {
        let text = "DECRETO Nº 13/2023\nArt. 1º  Fica aberto...\n";
        let prompt = PromptBuilder::new(text, ResponseSchema::Decretos).build();
        assert!(prompt.contains(text));
        assert!(prompt.contains("<texto_decreto>"));
        assert!(prompt.contains("</texto_decreto>"));
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let prompt = PromptBuilder::new("x", ResponseSchema::Decretos).build();
        assert!(prompt.contains("Excesso de Arrecadação"));
        assert!(prompt.contains("Créditos Extraordinários"));
        assert!(prompt.contains("codigo_fonte"));
    }

    #[test]
    fn test_prompt_enumerates_normalized_vocabulary() {
        for schema in [ResponseSchema::Decretos, ResponseSchema::Quadros] {
            let prompt = PromptBuilder::new("x", schema).build();
            for name in CREDIT_TYPES.iter().chain(SOURCE_NAMES.iter()) {
                assert!(prompt.contains(&format!("\"{}\"", name)), "missing {}", name);
            }
        }
    }

    #[test]
    fn test_quoted_alternatives() {
        assert_eq!(quoted_alternatives(&["a", "b", "c"]), "\"a\", \"b\" ou \"c\"");
        assert_eq!(quoted_alternatives(&["a"]), "\"a\"");
        assert_eq!(quoted_alternatives(&[]), "");
    }

    #[test]
    fn test_decretos_schema_contract() {
        let prompt = PromptBuilder::new("x", ResponseSchema::Decretos).build();
        assert!(prompt.contains("\"decretos\""));
        assert!(!prompt.contains("\"quadro1\""));
    }

    #[test]
    fn test_quadros_schema_contract() {
        let prompt = PromptBuilder::new("x", ResponseSchema::Quadros).build();
        assert!(prompt.contains("\"quadro1\""));
        assert!(prompt.contains("\"quadro3\""));
        assert!(!prompt.contains("\"decretos\""));
    }
}
