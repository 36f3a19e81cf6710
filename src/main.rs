use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use jarslim::artifact::infer_artifact;
use jarslim::report::{ReportFormat, Reporter};
use jarslim::{ClasspathAssembler, CompressionLevel, Config, MinifyConfig};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// jarslim - Assemble a flat classpath, shrinking JARs to what is reachable
#[derive(Parser, Debug)]
#[command(name = "jarslim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory; config files and relative config paths resolve against it
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the archives and classpath.txt
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Additional dependency JAR (can be specified multiple times)
    #[arg(long, value_name = "FILE")]
    jar: Vec<PathBuf>,

    /// Directory scanned for dependency JARs (can be specified multiple times)
    #[arg(long, value_name = "DIR")]
    lib_dir: Vec<PathBuf>,

    /// Entry point class name; enables minification of all archives if unconfigured
    #[arg(long, value_name = "NAME")]
    entry_point: Vec<String>,

    /// Deflate level: default, or 0 through 9
    #[arg(long, value_name = "LEVEL")]
    compression_level: Option<CompressionLevel>,

    /// Fail instead of overwriting existing output files
    #[arg(long)]
    strict: bool,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Write the JSON summary to a file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("jarslim v{}", env!("CARGO_PKG_VERSION"));

    run(&cli).wrap_err("Failed to create classpath")
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path).into_diagnostic()?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path).into_diagnostic()?
    };
    config.resolve_paths(&cli.path);

    // Override with CLI arguments
    if let Some(output) = &cli.output {
        config.output_directory = Some(output.clone());
    }
    if let Some(level) = cli.compression_level {
        config.compression_level = level;
    }
    if cli.strict {
        config.strict = true;
    }
    for jar in &cli.jar {
        let artifact = infer_artifact(jar)
            .ok_or_else(|| miette::miette!("Cannot infer artifact coordinates from {}", jar.display()))?;
        config.dependencies.push(artifact);
    }
    config.library_directories.extend(cli.lib_dir.iter().cloned());
    if !cli.entry_point.is_empty() {
        let minify = config.minify.get_or_insert_with(|| MinifyConfig {
            artifacts: vec!["*:*".to_string()],
            ..MinifyConfig::default()
        });
        minify.entry_points.extend(cli.entry_point.iter().cloned());
    }

    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let start_time = Instant::now();
    let config = load_config(cli)?;

    let assembler = ClasspathAssembler::new(&config);
    let interactive = !cli.quiet && cli.format == OutputFormat::Terminal;

    let pb = if interactive {
        let pb = ProgressBar::new(assembler.ordered_artifacts().len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .into_diagnostic()?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let summary = assembler
        .assemble_with_progress(|artifact| {
            pb.set_message(artifact.coordinates());
            pb.inc(1);
        })
        .into_diagnostic();
    pb.finish_and_clear();
    let summary = summary?;

    Reporter::new(cli.format.into(), cli.report.clone())
        .with_removable(cli.verbose)
        .with_quiet(cli.quiet)
        .report(&summary)?;

    if interactive {
        let elapsed = start_time.elapsed();
        println!(
            "{}",
            format!(
                "Assembled {} archives in {:.2}s",
                summary.entries.len(),
                elapsed.as_secs_f64()
            )
            .dimmed()
        );
    }

    Ok(())
}
