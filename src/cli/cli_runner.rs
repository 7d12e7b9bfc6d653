use clap::Parser;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{CliArgs, Commands, OutputFormat, OutputFormatter, ReplSession};
use crate::engine::Engine;
use crate::utils::{config::EngineConfig, error::EngineResult};

/// Main CLI runner that handles one-shot command execution
pub struct CliRunner {
    engine: Engine,
    format: OutputFormat,
}

impl CliRunner {
    /// Create a new CLI runner from a resolved configuration
    pub fn new(config: EngineConfig) -> Self {
        let format = config.output.format;
        Self {
            engine: Engine::new(config),
            format,
        }
    }

    /// Load `file`, execute a SQL query and return formatted results
    pub async fn execute_query(&mut self, file: &Path, sql: &str) -> EngineResult<String> {
        let summary = self.engine.load(file).await?;
        debug!(%summary, "dataset ready");

        let result = self.engine.execute_query(sql)?;
        Ok(OutputFormatter::format_result(&result, self.format))
    }

    /// Load `file` and describe its table
    pub async fn show_schema(&mut self, file: &Path) -> EngineResult<String> {
        self.engine.load(file).await?;

        match self.engine.dataset() {
            Some(dataset) => Ok(OutputFormatter::format_schema(&dataset)),
            None => Ok(OutputFormatter::format_info("No data loaded.")),
        }
    }

    /// Hand the engine over to an interactive session
    pub fn into_repl(self) -> ReplSession {
        ReplSession::new(self.engine, self.format)
    }
}

/// Resolve the engine configuration: file values first, then CLI overrides
pub fn resolve_config(args: &CliArgs) -> EngineResult<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    if let Some(delimiter) = args.delimiter {
        config.loader.delimiter = delimiter;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    config.validate()?;
    Ok(config)
}

/// Install the stderr log subscriber; `verbose` forces debug output for this crate
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("minisql_engine=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "minisql_engine=warn".into())
    };

    // A subscriber may already be installed (tests, embedding applications)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    };
    debug!(?config, "configuration resolved");

    let mut runner = CliRunner::new(config);

    match args.command.unwrap_or(Commands::Repl { file: None }) {
        Commands::Repl { file } => runner.into_repl().run(file).await,

        Commands::Query { file, sql } => match runner.execute_query(&file, &sql).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", OutputFormatter::format_error(&e));
                std::process::exit(1);
            }
        },

        Commands::Schema { file } => match runner.show_schema(&file).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", OutputFormatter::format_error(&e));
                std::process::exit(1);
            }
        },
    }
}
