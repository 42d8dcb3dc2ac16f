use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use marquee_prediction::{
    format_millions, sample_movies, EngineConfig, MovieInput, PredictionEngine, PredictionResult,
    PredictionTelemetry,
};
use shared_logging::LogLevel;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TOP_FEATURES: usize = 6;

#[derive(Parser, Debug)]
#[command(name = "marquee", version, about = "Movie success prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scores a movie record.
    Predict(PredictArgs),
    /// Lists the bundled sample movies.
    Samples,
    /// Prints the effective weights and reference tables.
    Tables {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
struct PredictArgs {
    /// JSON movie record (camelCase fields).
    #[arg(long, conflicts_with = "sample")]
    input: Option<PathBuf>,
    /// 1-based index into `marquee samples`.
    #[arg(long)]
    sample: Option<usize>,
    /// TOML file overriding weights and tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reject out-of-range input instead of falling back.
    #[arg(long)]
    strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Appends JSON-lines prediction records to this file.
    #[arg(long)]
    log: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = RecordLevel::Info)]
    log_level: RecordLevel,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecordLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<RecordLevel> for LogLevel {
    fn from(level: RecordLevel) -> Self {
        match level {
            RecordLevel::Debug => Self::Debug,
            RecordLevel::Info => Self::Info,
            RecordLevel::Warn => Self::Warn,
            RecordLevel::Error => Self::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    print!("{}", run(cli.command)?);
    Ok(())
}

fn run(command: Commands) -> Result<String> {
    match command {
        Commands::Predict(args) => handle_predict(&args),
        Commands::Samples => {
            let mut out = String::new();
            for (idx, movie) in sample_movies().iter().enumerate() {
                writeln!(
                    out,
                    "{} | {} | {} | ${}M | month {}",
                    idx + 1,
                    movie.title,
                    movie.genre,
                    movie.budget,
                    movie.release_month
                )?;
            }
            Ok(out)
        }
        Commands::Tables { config } => {
            let engine = PredictionEngine::builder()
                .config(load_config(config.as_deref())?)
                .build()?;
            Ok(format!(
                "{}\n",
                serde_json::to_string_pretty(&engine.config().view())?
            ))
        }
    }
}

fn handle_predict(args: &PredictArgs) -> Result<String> {
    let movie = load_movie(args.input.as_deref(), args.sample)?;
    let mut builder = PredictionEngine::builder().config(load_config(args.config.as_deref())?);
    if let Some(path) = &args.log {
        let telemetry = PredictionTelemetry::builder("marquee")
            .log_path(path)
            .min_level(args.log_level.into())
            .build()
            .with_context(|| format!("opening prediction log {}", path.display()))?;
        builder = builder.telemetry(telemetry);
    }
    let engine = builder.build()?;

    let result = if args.strict {
        engine.try_predict(&movie)?
    } else {
        engine.predict(&movie)
    };
    tracing::info!(title = %movie.title, probability = result.success_probability, "scored");
    if let Some(path) = engine.telemetry().and_then(PredictionTelemetry::log_path) {
        tracing::debug!(path = %path.display(), "prediction record appended");
    }

    match args.format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&result)?)),
        OutputFormat::Text => render_text(&movie, &result),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    path.map_or_else(|| Ok(EngineConfig::default()), EngineConfig::load)
}

fn load_movie(input: Option<&Path>, sample: Option<usize>) -> Result<MovieInput> {
    if let Some(path) = input {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading movie record {}", path.display()))?;
        return serde_json::from_str(&raw)
            .with_context(|| format!("parsing movie record {}", path.display()));
    }
    match sample {
        Some(index) => {
            let samples = sample_movies();
            let count = samples.len();
            match index.checked_sub(1).and_then(|idx| samples.into_iter().nth(idx)) {
                Some(movie) => Ok(movie),
                None => bail!("sample {index} not found (1..={count})"),
            }
        }
        None => Ok(MovieInput::default()),
    }
}

fn render_text(movie: &MovieInput, result: &PredictionResult) -> Result<String> {
    let mut out = String::new();
    let title = if movie.title.is_empty() {
        "Untitled"
    } else {
        movie.title.as_str()
    };
    let revenue = result.estimated_revenue;
    writeln!(out, "{title}")?;
    writeln!(
        out,
        "  Success probability: {}% ({:?})",
        result.success_probability,
        result.band()
    )?;
    writeln!(out, "  Risk: {}", result.risk_level.label())?;
    writeln!(
        out,
        "  Revenue: {} - {} (expected {})",
        format_millions(revenue.min),
        format_millions(revenue.max),
        format_millions(revenue.expected)
    )?;
    writeln!(out, "  Revenue at risk: {}", format_millions(result.revenue_at_risk))?;

    writeln!(out, "Top factors:")?;
    for factor in result.top_features(TOP_FEATURES) {
        let sign = if factor.is_positive { '+' } else { '-' };
        writeln!(
            out,
            "  {sign} {:<24} {:+.2}  {}",
            factor.feature, factor.impact, factor.description
        )?;
    }
    writeln!(out, "Why:")?;
    for line in &result.explanation {
        writeln!(out, "  - {line}")?;
    }
    writeln!(out, "Recommendations:")?;
    for line in &result.recommendations {
        writeln!(out, "  - {line}")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_prediction::predict;
    use tempfile::tempdir;

    #[test]
    fn samples_are_one_based() {
        let movie = load_movie(None, Some(1)).unwrap();
        assert_eq!(movie.title, "Horizon's Edge");
        assert!(load_movie(None, Some(0)).is_err());
        assert!(load_movie(None, Some(4)).is_err());
        assert_eq!(load_movie(None, None).unwrap(), MovieInput::default());
    }

    #[test]
    fn reads_camel_case_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("movie.json");
        fs::write(
            &path,
            r#"{"title":"Night Shift","genre":"Thriller","language":"Korean","budget":40,
                "runtime":112,"releaseMonth":10,"leadActorPopularity":58,"directorScore":71,
                "trailerSentiment":0.4,"socialBuzz":63,"sequelOrFranchise":false,
                "hasAwardWinningCrew":true}"#,
        )
        .unwrap();
        let movie = load_movie(Some(&path), None).unwrap();
        assert_eq!(movie.language, "Korean");
        assert_eq!(movie.release_month, 10);
        assert!(movie.has_award_winning_crew);

        let missing = load_movie(Some(&dir.path().join("absent.json")), None).unwrap_err();
        assert!(missing.to_string().contains("reading movie record"));
    }

    #[test]
    fn text_report_lists_six_factors() {
        let movie = load_movie(None, Some(1)).unwrap();
        let report = render_text(&movie, &predict(&movie)).unwrap();
        assert!(report.starts_with("Horizon's Edge\n"));
        assert!(report.contains("Success probability: 73.6% (Strong)"));
        assert!(report.contains("Risk: Low Risk"));
        assert!(report.contains("Revenue: $191M - $445M (expected $318M)"));
        let factors = report
            .lines()
            .skip_while(|line| *line != "Top factors:")
            .skip(1)
            .take_while(|line| *line != "Why:")
            .count();
        assert_eq!(factors, TOP_FEATURES);
    }

    fn run_args(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("marquee").chain(args.iter().copied()))?;
        run(cli.command)
    }

    #[test]
    fn strict_predict_rejects_zero_budget() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("free.json");
        let movie = MovieInput {
            title: "Free Lunch".into(),
            budget: 0.0,
            ..MovieInput::default()
        };
        fs::write(&path, serde_json::to_string(&movie).unwrap()).unwrap();
        let input = path.to_str().unwrap();

        let err = run_args(&["predict", "--strict", "--input", input]).unwrap_err();
        let reason = format!("{err:#}");
        assert!(reason.contains("budget must be positive"), "{reason}");

        let lenient = run_args(&["predict", "--input", input]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&lenient).unwrap();
        assert!(value["successProbability"].is_f64());
    }

    #[test]
    fn predict_appends_log_records() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("logs").join("predict.jsonl");
        let log_arg = log.to_str().unwrap();
        let report = run_args(&[
            "predict", "--sample", "3", "--format", "text", "--log", log_arg,
        ])
        .unwrap();
        assert!(report.starts_with("Whispers in the Dark\n"));
        let content = fs::read_to_string(&log).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.contains("prediction.completed"));

        let quiet = run_args(&[
            "predict",
            "--sample",
            "1",
            "--log",
            log_arg,
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert!(quiet.contains("\"riskLevel\": \"Low\""));
        assert_eq!(fs::read_to_string(&log).unwrap().lines().count(), 1);
    }

    #[test]
    fn tables_print_effective_config() {
        let printed = run_args(&["tables"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(value["weights"]["actor"], 0.18);
        assert_eq!(value["tables"]["genres"]["Sci-Fi"], 0.7);
        assert_eq!(value["tables"]["release_months"].as_array().unwrap().len(), 12);

        let dir = tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        fs::write(&path, "[genres]\nMusical = 0.57\n").unwrap();
        let tuned = run_args(&["tables", "--config", path.to_str().unwrap()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&tuned).unwrap();
        assert_eq!(value["tables"]["genres"]["Musical"], 0.57);

        fs::write(&path, "[weights]\ngenre = 0.9\n").unwrap();
        assert!(run_args(&["tables", "--config", path.to_str().unwrap()]).is_err());
    }

    #[test]
    fn samples_listing_is_numbered() {
        let listing = run_args(&["samples"]).unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "1 | Horizon's Edge | Sci-Fi | $180M | month 7");
    }
}
