//! Quadros CLI - Extract additional-credit tables from municipal budget decrees.

use clap::Parser;
use quadros_cli::{check_connection, Cli, CliError, Config, Formatter, Pipeline};
use quadros_llm::GeminiProvider;
use quadros_report::ReportWriter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Before tracing, so RUST_LOG may come from the env file
    let env_file = Config::load_env_file(cli.env_file.as_deref());
    init_tracing(cli.verbose);
    let color = !cli.no_color;

    let result = match env_file {
        Ok(loaded) => {
            if let Some(path) = loaded {
                info!(path = %path.display(), "Loaded environment file");
            }
            run(cli).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{}", Formatter::new(color).error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

/// Log to stderr; `-v` flags win over `RUST_LOG`, which wins over `info`
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> quadros_cli::Result<()> {
    // Load config, then let flags override it
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);
    config.validate()?;

    let formatter = Formatter::new(config.output.color);

    if cli.check {
        return check(&config, &formatter).await;
    }

    // Fatal conditions are checked before any call is made
    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| CliError::Config("No input file given".into()))?;
    let corpus = quadros_cli::read_corpus(input)?;
    let provider = gemini_provider(&config)?;

    let writer = ReportWriter::new(config.output.dir.clone()).with_prefix(config.output.prefix.clone());
    let pipeline = Pipeline::new(provider, config.extractor.clone(), writer)?;

    // First Ctrl+C stops submission and lets in-flight calls finish or time out;
    // a second one exits at once
    let stop = pipeline.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, waiting for in-flight calls before writing reports");
            stop.stop();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    let summary = pipeline
        .run(&corpus, |outcome, progress| {
            eprintln!("{}", formatter.progress(outcome, progress));
        })
        .await?;

    if summary.fragments == 0 {
        println!("{}", formatter.warning("No admissible decree fragments found"));
    }
    println!("{}", formatter.run_summary(&summary.progress, &summary.metadata));
    println!("{}", formatter.report_table(&summary.reports, &summary.files));

    if summary.interrupted {
        println!(
            "{}",
            formatter.warning(&format!(
                "Interrupted: {} fragment(s) were not submitted",
                summary.progress.unprocessed()
            ))
        );
        return Err(CliError::Interrupted);
    }

    Ok(())
}

fn gemini_provider(config: &Config) -> quadros_cli::Result<GeminiProvider> {
    let api_key = config.api_key()?;

    let provider = GeminiProvider::new(
        api_key,
        config.gemini.model.clone(),
        config.extractor.extraction_timeout(),
    )?
    .with_endpoint(config.gemini.endpoint.clone())
    .with_json_mode(config.gemini.json_mode);

    info!(model = %config.gemini.model, "Using Gemini");
    Ok(provider)
}

/// `--check`: one trivial prompt, reply printed as-is
async fn check(config: &Config, formatter: &Formatter) -> quadros_cli::Result<()> {
    // Free text reply, not the JSON contract used for decrees
    let provider = gemini_provider(config)?.with_json_mode(false);
    let reply = check_connection(&provider).await?;

    println!(
        "{}",
        formatter.success(&format!("Connected to {}", config.gemini.model))
    );
    println!("{}", reply.trim());
    Ok(())
}
