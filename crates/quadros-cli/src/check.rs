//! Oracle connectivity check.

use crate::error::{CliError, Result};
use quadros_domain::traits::LlmProvider;
use tracing::info;

/// Short prompt sent to verify the key, model and endpoint
pub const CONNECTION_CHECK_PROMPT: &str = "Olá, teste de conexão";

/// Send one trivial prompt and return the oracle's reply
///
/// Any provider error becomes [`CliError::Connection`]; no decree is
/// extracted and no report is written.
pub async fn check_connection<L>(llm: &L) -> Result<String>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    info!(model = llm.model_name(), "Checking oracle connection");

    llm.generate(CONNECTION_CHECK_PROMPT)
        .await
        .map_err(|e| CliError::Connection(e.to_string()))
}
