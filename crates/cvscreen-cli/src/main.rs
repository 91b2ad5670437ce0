use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use cvscreen_core::config_file::{ConfigFile, load_config};
use cvscreen_core::{ProgressEvent, ResumeFile};
use cvscreen_pdf_mupdf::MupdfBackend;
use cvscreen_reporting::ExportFormat;

mod output;

use output::ColorMode;

const DEFAULT_MODEL_PATH: &str = "resume_classifier.json";

/// Resume Screener - Classify PDF resumes with a pre-trained text pipeline
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Screen one or more PDF resumes
    Screen {
        /// PDF files to screen, processed in the given order
        files: Vec<PathBuf>,

        /// Path to the pipeline artifact (JSON)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Seed for comment randomization (fixed seed gives deterministic comments)
        #[arg(long)]
        seed: Option<u64>,

        /// Write results to this path instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format for --output
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Extract and print cleaned text without classifying
        #[arg(long)]
        dry_run: bool,
    },

    /// Show metadata about the pipeline artifact
    Inspect {
        /// Path to the pipeline artifact (JSON)
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
            Format::Text => ExportFormat::Text,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Screen {
            files,
            model,
            seed,
            output,
            format,
            no_color,
            dry_run,
        } => {
            if dry_run {
                dry_run_screen(files, no_color)
            } else {
                screen(files, model, seed, output, format, no_color)
            }
        }
        Command::Inspect { model } => inspect(model),
    }
}

/// Resolve the artifact path: CLI flag > env var > config file > default.
fn resolve_model_path(flag: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    flag.or_else(|| std::env::var("CVSCREEN_MODEL").ok().map(PathBuf::from))
        .or_else(|| {
            config
                .model
                .as_ref()
                .and_then(|m| m.path.clone())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Resolve the comment seed: CLI flag > env var > config file.
fn resolve_seed(flag: Option<u64>, config: &ConfigFile) -> Option<u64> {
    flag.or_else(|| {
        std::env::var("CVSCREEN_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
    })
    .or_else(|| config.screening.as_ref().and_then(|s| s.seed))
}

fn read_inputs(files: &[PathBuf]) -> anyhow::Result<Vec<ResumeFile>> {
    if files.is_empty() {
        anyhow::bail!("No input files given");
    }

    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        inputs.push(ResumeFile::new(name, data));
    }
    Ok(inputs)
}

fn screen(
    files: Vec<PathBuf>,
    model: Option<PathBuf>,
    seed: Option<u64>,
    output: Option<PathBuf>,
    format: Format,
    no_color: bool,
) -> anyhow::Result<()> {
    let config = load_config();
    let model_path = resolve_model_path(model, &config);

    let config_color = config
        .display
        .as_ref()
        .and_then(|d| d.color)
        .unwrap_or(true);
    let color = ColorMode(!no_color && config_color);

    let inputs = read_inputs(&files)?;

    // Model-load failure is fatal: nothing can be screened without it.
    let pipeline = cvscreen_model::LinearPipeline::load(&model_path).map_err(|e| {
        anyhow::anyhow!(
            "Could not load the classification pipeline from {}: {}",
            model_path.display(),
            e
        )
    })?;

    let mut rng = match resolve_seed(seed, &config) {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let backend = MupdfBackend::new();

    let bar = ProgressBar::new(inputs.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let outcome = cvscreen_core::screen_files(&inputs, &backend, &pipeline, &mut rng, |event| {
        if let ProgressEvent::Extracting { file, .. } = &event {
            bar.set_message(file.clone());
            bar.inc(1);
        }
        if let Some(line) = output::format_event(&event, color) {
            bar.println(line);
        }
    });
    bar.finish_and_clear();

    let mut stdout = std::io::stdout();
    output::print_summary(&mut stdout, &outcome.stats, color)?;

    match output {
        Some(path) => {
            cvscreen_reporting::export_results(
                &outcome.records,
                &outcome.stats,
                format.into(),
                &path,
            )
            .map_err(|e| anyhow::anyhow!(e))?;
            writeln!(stdout, "Results written to {}", path.display())?;
        }
        None => {
            if !outcome.records.is_empty() {
                writeln!(stdout)?;
                output::print_records(&mut stdout, &outcome.records, color)?;
            }
        }
    }

    Ok(())
}

/// Extract and clean without touching the model: shows what the classifier
/// would actually see.
fn dry_run_screen(files: Vec<PathBuf>, no_color: bool) -> anyhow::Result<()> {
    use owo_colors::OwoColorize;

    let color = ColorMode(!no_color);
    let inputs = read_inputs(&files)?;
    let backend = MupdfBackend::new();

    let mut stdout = std::io::stdout();
    for input in &inputs {
        match cvscreen_core::extract_text(&input.data, &backend) {
            Ok(raw) => {
                let cleaned = cvscreen_core::clean_text(&raw);
                let preview: String = cleaned.chars().take(200).collect();
                if color.enabled() {
                    writeln!(stdout, "{}", input.name.bold())?;
                } else {
                    writeln!(stdout, "{}", input.name)?;
                }
                writeln!(
                    stdout,
                    "  {} raw chars, {} cleaned chars",
                    raw.chars().count(),
                    cleaned.chars().count()
                )?;
                if cleaned.is_empty() {
                    writeln!(stdout, "  (would be skipped: no usable text)")?;
                } else if color.enabled() {
                    writeln!(stdout, "  {}", preview.dimmed())?;
                } else {
                    writeln!(stdout, "  {}", preview)?;
                }
            }
            Err(e) => {
                if color.enabled() {
                    writeln!(stdout, "{} {}: {}", "WARNING:".yellow(), input.name, e)?;
                } else {
                    writeln!(stdout, "WARNING: {}: {}", input.name, e)?;
                }
            }
        }
        writeln!(stdout)?;
    }

    Ok(())
}

fn inspect(model: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config();
    let model_path = resolve_model_path(model, &config);

    let pipeline = cvscreen_model::LinearPipeline::load(&model_path).map_err(|e| {
        anyhow::anyhow!(
            "Could not load the classification pipeline from {}: {}",
            model_path.display(),
            e
        )
    })?;

    println!("Artifact:   {}", model_path.display());
    println!("Version:    {}", pipeline.version());
    println!("Classes:    {:?}", pipeline.classes());
    println!("Vocabulary: {} tokens", pipeline.vocabulary_size());

    Ok(())
}
