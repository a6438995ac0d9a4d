//! Facet Query
//!
//! Command-line front end over the facet criterion library: classify
//! taxonomy vocabularies, restore criteria from RQL queries, edit them and
//! print the rebuilt query.

use anyhow::Result;
use clap::Parser;
use facet_query::cli::{Cli, Commands};
use facet_query::commands::{CommandError, CommandExecutor};
use facet_query::config::{FacetQueryConfig, DEFAULT_CONFIG_FILE};
use facet_query::output::{ErrorCode, ExitCode, JsonError, JsonOutput, OutputContext};
use facet_query::rql::RqlError;
use facet_query::Taxonomy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = command_name(&cli.command);
    let json = cli.json;

    let exit_code = match run(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            let code = error_code(&e);
            if json {
                let mut error = JsonError::new(code, format!("{:#}", e), command);
                if code == ErrorCode::VOCABULARY_NOT_FOUND {
                    error = error.with_suggestion(
                        "Run 'facet-query classify <TAXONOMY>' to list vocabularies",
                    );
                }
                match error.to_json_string() {
                    Ok(text) => println!("{}", text),
                    Err(_) => eprintln!("Error: {:#}", e),
                }
                error.exit_code()
            } else {
                eprintln!("Error: {:#}", e);
                ErrorCode::to_exit_code(code)
            }
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Classify { .. } => "classify",
        Commands::Walk { .. } => "walk",
        Commands::Show { .. } => "show",
        Commands::Set { .. } => "set",
        Commands::Build { .. } => "build",
        Commands::Schema => "schema",
    }
}

/// Map an error to its JSON error code
fn error_code(error: &anyhow::Error) -> &'static str {
    if let Some(e) = error.downcast_ref::<CommandError>() {
        return match e {
            CommandError::VocabularyNotFound(_) => ErrorCode::VOCABULARY_NOT_FOUND,
            CommandError::NoCriterion(_) => ErrorCode::NO_CRITERION,
            CommandError::Query(_) => ErrorCode::PARSE_ERROR,
            CommandError::InvalidValue(_) => ErrorCode::INVALID_ARGUMENT,
        };
    }

    for cause in error.chain() {
        if cause.is::<RqlError>() || cause.is::<serde_json::Error>() || cause.is::<toml::de::Error>()
        {
            return ErrorCode::PARSE_ERROR;
        }
        if let Some(io_error) = cause.downcast_ref::<std::io::Error>() {
            return match io_error.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::FILE_NOT_FOUND,
                _ => ErrorCode::IO_ERROR,
            };
        }
    }

    ErrorCode::INTERNAL
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = FacetQueryConfig::load(&config_path)?;
    tracing::debug!(config = %config_path.display(), "configuration loaded");

    let executor = CommandExecutor::new(config);
    let output = OutputContext::new(cli.quiet, cli.json);
    let command = command_name(&cli.command);

    match cli.command {
        Commands::Classify { taxonomy } => {
            let taxonomy = Taxonomy::load(&taxonomy)?;
            let report = executor.classify(&taxonomy);

            if output.is_json() {
                output.print_json(&JsonOutput::success(&report, command))?;
            } else {
                output.print_info(format!(
                    "{}: {} vocabularies",
                    taxonomy.name,
                    report.len()
                ))?;
                for entry in &report {
                    let kind = entry
                        .kind
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    output.print_data(format!("{}\t{}", entry.name, kind))?;
                }
            }
        }
        Commands::Walk { query } => {
            let leaves = executor.walk(&query)?;

            if output.is_json() {
                let data = serde_json::json!({
                    "leaves": leaves,
                    "text": leaves.iter().map(ToString::to_string).collect::<Vec<_>>(),
                });
                output.print_json(&JsonOutput::success(data, command))?;
            } else {
                for leaf in &leaves {
                    output.print_data(leaf)?;
                }
            }
        }
        Commands::Show {
            taxonomy,
            vocabulary,
            query,
            prefix,
        } => {
            let taxonomy = Taxonomy::load(&taxonomy)?;
            let report =
                executor.show(&taxonomy, &vocabulary, query.as_deref(), prefix.as_deref())?;
            print_criterion(&output, &report, command)?;
        }
        Commands::Set {
            taxonomy,
            vocabulary,
            operator,
            values,
            query,
            prefix,
        } => {
            let taxonomy = Taxonomy::load(&taxonomy)?;
            let report = executor.edit(
                &taxonomy,
                &vocabulary,
                query.as_deref(),
                operator.as_deref(),
                &values,
                prefix.as_deref(),
            )?;
            print_criterion(&output, &report, command)?;
        }
        Commands::Build {
            taxonomy,
            query,
            prefix,
        } => {
            let taxonomy = Taxonomy::load(&taxonomy)?;
            let report = executor.build(&taxonomy, query.as_deref(), prefix.as_deref())?;

            if output.is_json() {
                output.print_json(&JsonOutput::success(&report, command))?;
            } else {
                match &report.query {
                    Some(query) => {
                        output.print_data(query)?;
                        output.print_info(format!("Criteria: {}", report.display))?;
                    }
                    None => output.print_info("No active criteria")?,
                }
            }
        }
        Commands::Schema => {
            let schema = executor.schema();

            if output.is_json() {
                output.print_json(&JsonOutput::success(&schema, command))?;
            } else {
                output.print_data(serde_json::to_string_pretty(&schema)?)?;
            }
        }
    }

    Ok(())
}

fn print_criterion(
    output: &OutputContext,
    report: &facet_query::commands::CriterionReport,
    command: &str,
) -> Result<()> {
    if output.is_json() {
        output.print_json(&JsonOutput::success(report, command))?;
    } else {
        output.print_data(&report.query)?;
        output.print_info(format!(
            "{} [{}] {}",
            report.kind, report.operator, report.display
        ))?;
    }
    Ok(())
}
