//! # emma-cli
//!
//! Command-line interface for the Emma config analyzer.
//!
//! Device configurations are split into segments, fields are extracted
//! into CSV records, and record files are checked against source-of-truth
//! schemas.

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use config::{EmmaConfig, FeatureFlags, log_directive};
use emma_adapter_csv::CsvAdapter;
use emma_extract::RuleSet;
use emma_ir::ParsedConfig;
use emma_pipeline::{Pipeline, PipelineConfig, Platform};
use emma_schema::SchemaLoader;
use emma_validation::ValidationReport;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "emma")]
#[command(about = "Network device configuration analyzer")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `emma_pipeline=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the segment patterns of a platform
    Patterns {
        /// Platform (ios or junos)
        #[arg(short, long)]
        platform: Option<Platform>,
    },

    /// Split a device configuration into segments
    Segments {
        /// Device configuration file
        input: PathBuf,

        #[arg(short, long)]
        platform: Option<Platform>,

        /// Only print this segment
        #[arg(short, long)]
        segment: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Extract records from one segment as CSV
    Extract {
        /// Device configuration file
        input: PathBuf,

        /// Rule file mapping field names to regular expressions (Rust regex
        /// syntax: no look-around or backreferences)
        #[arg(short, long)]
        rules: PathBuf,

        #[arg(short, long)]
        segment: String,

        #[arg(short, long)]
        platform: Option<Platform>,

        /// Output CSV file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a CSV record file against a schema
    Validate {
        /// Record file
        input: PathBuf,

        /// Schema file (JSON or YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Schema kind, e.g. InfraVlan
        #[arg(short, long)]
        kind: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Exit code of a command that could not run
const FAILURE: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(FAILURE)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => EmmaConfig::load(path)?,
        None => EmmaConfig::default(),
    };
    init_logging(cli.log_level.as_deref(), config.log_level.as_deref())?;
    let flags = config.feature_flags();
    if let Some(path) = &cli.config {
        info!(path = %path.display(), features = ?flags.iter().collect::<Vec<_>>(), "Loaded config");
    }

    match cli.command {
        Commands::Patterns { platform } => {
            list_patterns(&config, &flags, platform.unwrap_or(config.platform));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Segments {
            input,
            platform,
            segment,
            format,
        } => {
            let pipeline = build_pipeline(&config, &flags, platform);
            let text = read_input(&input)?;
            let mut parsed = pipeline.parse(&text);
            if let Some(segment) = segment {
                parsed = parsed.select(&segment);
            }
            match format {
                OutputFormat::Text => print!("{}", render_segments(&parsed)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&parsed)?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Extract {
            input,
            rules,
            segment,
            platform,
            output,
        } => {
            let rule_set = RuleSet::from_file(&rules)
                .with_context(|| format!("Failed to load rules from {}", rules.display()))?;
            let pipeline = build_pipeline(&config, &flags, platform).with_rules(&rule_set);
            for skipped in pipeline.extractor().skipped() {
                eprintln!("Skipped rule '{}': {}", skipped.field, skipped.reason);
            }

            let text = read_input(&input)?;
            let analysis = pipeline.analyze(&hostname(&input), &text, &segment);
            let writer = CsvAdapter::new().writer();
            match output {
                Some(path) => writer
                    .write_path(&path, &analysis.records)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => writer.write(std::io::stdout().lock(), &analysis.records)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate {
            input,
            schema,
            kind,
        } => {
            let registry = SchemaLoader::default()
                .load_registry_from_file(&schema)
                .with_context(|| format!("Failed to load schema from {}", schema.display()))?;
            let target = registry.require(&kind)?;
            let records = CsvAdapter::new()
                .reader()
                .read_path(&input)
                .with_context(|| format!("Failed to read records from {}", input.display()))?;

            let report = ValidationReport::new(emma_validation::validate(&records, target));
            println!("{report}");
            Ok(exit_code(&report))
        }
    }
}

fn init_logging(flag: Option<&str>, configured: Option<&str>) -> anyhow::Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = log_directive(flag, env.as_deref(), configured);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter '{directive}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_pipeline(config: &EmmaConfig, flags: &FeatureFlags, platform: Option<Platform>) -> Pipeline {
    let platform = platform.unwrap_or(config.platform);
    Pipeline::with_config(PipelineConfig::new(platform))
        .with_ios_parser(config.ios_parser())
        .with_junos_segmenter(config.junos_segmenter(flags))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Device name used for extracted records: the file name without extension
fn hostname(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_patterns(config: &EmmaConfig, flags: &FeatureFlags, platform: Platform) {
    match platform {
        Platform::Ios => {
            let registry = config.pattern_registry();
            for pattern in registry.patterns() {
                println!("{:<16} {}", pattern.name(), pattern.describe());
            }
            for skipped in registry.skipped() {
                eprintln!("Skipped pattern '{}': {}", skipped.name, skipped.reason);
            }
        }
        Platform::Junos => {
            let segmenter = config.junos_segmenter(flags);
            for path in segmenter.registry().paths() {
                println!("{:<18} {}", path.name, path.describe());
            }
            for skipped in segmenter.registry().skipped() {
                eprintln!("Skipped path '{}': {}", skipped.name, skipped.reason);
            }
        }
    }
}

/// One `== name (count) ==` header per segment followed by its instances
fn render_segments(parsed: &ParsedConfig) -> String {
    let mut out = String::new();
    for (name, blocks) in parsed.iter() {
        out.push_str(&format!("== {name} ({}) ==\n", blocks.len()));
        for block in blocks {
            out.push_str(block);
            if !block.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

/// 0 when clean, 1 with warnings only, 2 with errors.
/// Failures to run at all exit with [`FAILURE`].
fn exit_code(report: &ValidationReport) -> ExitCode {
    if report.error_count() > 0 {
        ExitCode::from(2)
    } else if report.warning_count() > 0 {
        warn!(warnings = report.warning_count(), "Records have warnings");
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_segments() {
        let text = "vlan 10\n name users\n!\nntp server 10.0.0.1\n!\nend\n";
        let parsed = Pipeline::new(Platform::Ios).parse(text).select("vlan");

        assert_eq!(render_segments(&parsed), "== vlan (1) ==\nvlan 10\n name users\n");
    }

    #[test]
    fn test_hostname_from_path() {
        assert_eq!(hostname(Path::new("configs/r1_ios.cfg")), "r1_ios");
        assert_eq!(hostname(Path::new("")), "");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
