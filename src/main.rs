use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clinic_matcher::config::{Config, ConfigOverrides};
use clinic_matcher::directory::{CachedDirectory, ClinicRecord, RemoteDirectory};
use clinic_matcher::matching::{ClinicMatcher, MatchResult};
use clinic_matcher::output::csv::{clinics_to_csv, matches_to_csv};
use clinic_matcher::output::json::render_json;
use clinic_matcher::output::table::{
    render_breakdown_table, render_clinics_table, render_matches_table, render_questions_table,
};
use clinic_matcher::questionnaire::catalog::{self, validate};
use clinic_matcher::questionnaire::{Answer, ResponseSet};
use clinic_matcher::server::run_server;
use tracing::warn;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "clinic-matcher",
    about = "Match UK medical cannabis clinics to patient questionnaire answers"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    source_url: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank clinics against questionnaire answers
    Match {
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        urgency: Option<String>,
        /// Comma-separated ranked priorities, most important first
        #[arg(long)]
        priorities: Option<String>,
        /// JSON file of answers, overridden by any flags above
        #[arg(long)]
        answers: Option<PathBuf>,
        /// JSON file of advanced detail answers
        #[arg(long)]
        advanced: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        /// Disable ranking jitter for reproducible output
        #[arg(long)]
        deterministic: bool,
        /// Include the per-criterion score breakdown
        #[arg(long)]
        breakdown: bool,
    },
    /// List the current clinic directory
    Clinics,
    /// Print the question catalog
    Questions {
        #[arg(long)]
        advanced: bool,
    },
    /// Run the REST API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
    /// Inspect or initialise configuration
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let deterministic = matches!(
        cli.command,
        Commands::Match { deterministic: true, .. }
    );
    config.apply_overrides(ConfigOverrides {
        source_url: cli.source_url.clone(),
        result_limit: match &cli.command {
            Commands::Match { limit, .. } => *limit,
            _ => None,
        },
        deterministic,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let directory = open_directory(&config)?;

    match &cli.command {
        Commands::Match {
            condition,
            budget,
            location,
            urgency,
            priorities,
            answers,
            advanced,
            breakdown,
            ..
        } => {
            let responses = build_responses(
                answers.as_deref(),
                condition.as_deref(),
                budget.as_deref(),
                location.as_deref(),
                urgency.as_deref(),
                priorities.as_deref(),
            )?;
            let advanced_responses = advanced
                .as_deref()
                .map(load_responses_file)
                .transpose()?;

            for note in validate(&responses) {
                warn!("{}: {}", note.question_id, note.detail);
            }

            let clinics = directory.clinics().await;
            let matcher = ClinicMatcher::with_config(clinics, config.matcher_config());
            let matches = matcher.matches(&responses, advanced_responses.as_ref());
            print_matches(&matches, cli.output, *breakdown)?;
        }
        Commands::Clinics => {
            let clinics = directory.clinics().await;
            print_clinics(&clinics, cli.output)?;
        }
        Commands::Questions { advanced } => {
            let questions = if *advanced {
                catalog::advanced_questions()
            } else {
                catalog::questions()
            };
            match cli.output {
                OutputFormat::Table => println!("{}", render_questions_table(&questions)),
                OutputFormat::Json | OutputFormat::Csv => {
                    println!("{}", render_json(&questions)?)
                }
            }
        }
        Commands::Config { .. } | Commands::Serve { .. } => {
            unreachable!("handled before dispatch")
        }
    }

    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &PathBuf) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn open_directory(config: &Config) -> Result<Arc<CachedDirectory>> {
    let provider = RemoteDirectory::with_timeout(
        config.directory.source_url.clone(),
        config.directory.request_timeout_secs,
    )?;
    Ok(Arc::new(CachedDirectory::new(
        Arc::new(provider),
        Duration::from_secs(config.directory.cache_ttl_secs),
        config.directory.static_fallback,
    )))
}

fn load_responses_file(path: &std::path::Path) -> Result<ResponseSet> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading answers file: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("invalid answers JSON: {}", path.display()))
}

fn build_responses(
    answers_file: Option<&std::path::Path>,
    condition: Option<&str>,
    budget: Option<&str>,
    location: Option<&str>,
    urgency: Option<&str>,
    priorities: Option<&str>,
) -> Result<ResponseSet> {
    let mut responses = answers_file
        .map(load_responses_file)
        .transpose()?
        .unwrap_or_default();

    if let Some(condition) = condition {
        responses.insert(catalog::CONDITION, Answer::token(condition));
    }
    if let Some(budget) = budget {
        responses.insert(catalog::BUDGET, Answer::token(budget));
    }
    if let Some(location) = location {
        responses.insert(catalog::LOCATION, Answer::token(location));
    }
    if let Some(urgency) = urgency {
        responses.insert(catalog::URGENCY, Answer::token(urgency));
    }
    if let Some(raw) = priorities {
        let ranked: Vec<String> = raw
            .split(',')
            .map(|piece| piece.trim().to_string())
            .filter(|piece| !piece.is_empty())
            .collect();
        if !ranked.is_empty() {
            responses.insert(catalog::PRIORITIES, Answer::ranked(ranked));
        }
    }

    Ok(responses)
}

fn print_matches(matches: &[MatchResult], format: OutputFormat, breakdown: bool) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_matches_table(matches));
            if breakdown {
                println!("{}", render_breakdown_table(matches));
            }
        }
        OutputFormat::Json => println!("{}", render_json(matches)?),
        OutputFormat::Csv => println!("{}", matches_to_csv(matches)?),
    }
    Ok(())
}

fn print_clinics(clinics: &[ClinicRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_clinics_table(clinics)),
        OutputFormat::Json => println!("{}", render_json(clinics)?),
        OutputFormat::Csv => println!("{}", clinics_to_csv(clinics)?),
    }
    Ok(())
}
