//! Chocula command-line interface.
//!
//! - `fc`: Feldman-Cousins interval for one observed count
//! - `belt`: dump the Feldman-Cousins acceptance table
//! - `bayes`: Bayesian upper limit or credible interval
//! - `zero-bg`: closed-form zero-background half-life limit
//! - `check-settings`: validate the resolved settings file
//!
//! Results go to stdout; logs and error reports go to stderr.

use std::path::PathBuf;

use choc_config::validate::validate_settings;
use choc_config::{resolve_settings, MuGrid, Settings, SettingsPath, ValidationError};
use choc_core::exit_codes::ExitCode;
use choc_core::logging::{init_logging, LogConfig, LogFormat};
use choc_core::output::{
    render, BayesReport, BeltReport, FcReport, OutputFormat, Summary, ZeroBackgroundReport,
};
use choc_core::{
    counts_to_lifetime, poisson_zero_background, BayesianEngine, FeldmanCousinsEngine,
    IntervalError,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

/// Confidence intervals for rare-event counting experiments
#[derive(Parser)]
#[command(name = "choc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (falls back to CHOC_SETTINGS, CHOC_CONFIG_DIR, then XDG)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Log line format on stderr (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    quiet: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Feldman-Cousins interval for an observed count
    Fc(FcArgs),

    /// Print the Feldman-Cousins acceptance table
    Belt(BeltArgs),

    /// Bayesian upper limit or credible interval
    Bayes(BayesArgs),

    /// Zero-background half-life limit
    ZeroBg(ZeroBgArgs),

    /// Validate the resolved settings file
    CheckSettings,
}

/// Overrides applied on top of the settings file.
#[derive(Args, Debug, Clone, Default)]
struct EngineOverrides {
    /// Confidence level in (0, 1)
    #[arg(long, allow_negative_numbers = true)]
    cl: Option<f64>,

    /// Gaussian uncertainty on the expected background
    #[arg(long, allow_negative_numbers = true)]
    sigma: Option<f64>,

    /// Lower edge of the signal grid
    #[arg(long, allow_negative_numbers = true)]
    mu_min: Option<f64>,

    /// Upper edge of the signal grid (exclusive)
    #[arg(long, allow_negative_numbers = true)]
    mu_max: Option<f64>,

    /// Signal grid spacing
    #[arg(long, allow_negative_numbers = true)]
    mu_step: Option<f64>,
}

impl EngineOverrides {
    fn apply(&self, cl: &mut f64, sigma: &mut f64, grid: &mut MuGrid) {
        if let Some(v) = self.cl {
            *cl = v;
        }
        if let Some(v) = self.sigma {
            *sigma = v;
        }
        if let Some(v) = self.mu_min {
            grid.min = v;
        }
        if let Some(v) = self.mu_max {
            grid.max = v;
        }
        if let Some(v) = self.mu_step {
            grid.step = v;
        }
    }
}

#[derive(Args, Debug)]
struct FcArgs {
    /// Expected background count
    #[arg(long, short = 'b', allow_negative_numbers = true)]
    background: f64,

    /// Observed count
    #[arg(long, short = 'n')]
    observed: u64,

    /// Size of the candidate count space (default: derived from the grid)
    #[arg(long)]
    max_count: Option<u64>,

    #[command(flatten)]
    overrides: EngineOverrides,
}

#[derive(Args, Debug)]
struct BeltArgs {
    /// Expected background count
    #[arg(long, short = 'b', allow_negative_numbers = true)]
    background: f64,

    /// Size of the candidate count space (default: derived from the grid)
    #[arg(long)]
    max_count: Option<u64>,

    #[command(flatten)]
    overrides: EngineOverrides,
}

#[derive(Args, Debug)]
struct BayesArgs {
    /// Expected background count
    #[arg(long, short = 'b', allow_negative_numbers = true)]
    background: f64,

    /// Observed count (may be non-integer, e.g. after scaling)
    #[arg(long, short = 'n', allow_negative_numbers = true)]
    observed: f64,

    /// Report an upper limit instead of a two-sided interval
    #[arg(long)]
    one_sided: bool,

    #[command(flatten)]
    overrides: EngineOverrides,
}

#[derive(Args, Debug)]
struct ZeroBgArgs {
    /// Number of source nuclei
    #[arg(long, allow_negative_numbers = true)]
    atoms: f64,

    /// Live time (the limit is reported in the same unit)
    #[arg(long, allow_negative_numbers = true)]
    live_time: f64,

    /// Signal efficiency
    #[arg(long, allow_negative_numbers = true)]
    efficiency: f64,

    /// Confidence level in (0, 1)
    #[arg(long, default_value_t = 0.9, allow_negative_numbers = true)]
    cl: f64,

    /// Also convert this count limit to a half-life
    #[arg(long, allow_negative_numbers = true)]
    counts: Option<f64>,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env(None, cli.global.log_format);
    log_config.level = log_config.level.adjust(cli.global.verbose, cli.global.quiet);
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::Fc(args) => run_fc(&cli.global, args),
        Commands::Belt(args) => run_belt(&cli.global, args),
        Commands::Bayes(args) => run_bayes(&cli.global, args),
        Commands::ZeroBg(args) => run_zero_bg(&cli.global, args),
        Commands::CheckSettings => run_check_settings(&cli.global),
    };
    debug!(%exit_code, "done");
    exit_code.into()
}

/// Load the resolved settings file, or the built-in defaults.
fn load_settings(global: &GlobalOpts) -> Result<(Settings, SettingsPath), ValidationError> {
    if let Some(path) = &global.settings {
        if !path.exists() {
            return Err(ValidationError::IoError(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
    }
    let resolved = resolve_settings(global.settings.as_deref());
    let settings = match &resolved.path {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    validate_settings(&settings)?;
    debug!(source = %resolved.source, path = ?resolved.path, "settings loaded");
    Ok((settings, resolved))
}

fn run_fc(global: &GlobalOpts, args: &FcArgs) -> ExitCode {
    let (settings, _) = match load_settings(global) {
        Ok(loaded) => loaded,
        Err(e) => return report_settings_error(global, &e),
    };
    let mut fc = settings.feldman_cousins;
    args.overrides
        .apply(&mut fc.confidence_level, &mut fc.background_sigma, &mut fc.grid);
    if args.max_count.is_some() {
        fc.max_count = args.max_count;
    }

    let engine = match FeldmanCousinsEngine::new(args.background, fc) {
        Ok(engine) => engine,
        Err(e) => return report_error(global, &e),
    };
    let interval = engine.get_interval(args.observed);
    info!(
        observed = args.observed,
        lower = interval.lower,
        upper = interval.upper,
        covered = interval.is_covered(),
        "feldman-cousins interval"
    );

    let report = FcReport {
        background: engine.background(),
        background_sigma: engine.settings().background_sigma,
        observed: args.observed,
        confidence_level: engine.confidence_level(),
        interval,
    };
    match emit(global, &report) {
        ExitCode::Success if !interval.is_covered() => ExitCode::NoCoverage,
        code => code,
    }
}

fn run_belt(global: &GlobalOpts, args: &BeltArgs) -> ExitCode {
    let (settings, _) = match load_settings(global) {
        Ok(loaded) => loaded,
        Err(e) => return report_settings_error(global, &e),
    };
    let mut fc = settings.feldman_cousins;
    args.overrides
        .apply(&mut fc.confidence_level, &mut fc.background_sigma, &mut fc.grid);
    if args.max_count.is_some() {
        fc.max_count = args.max_count;
    }

    let engine = match FeldmanCousinsEngine::new(args.background, fc) {
        Ok(engine) => engine,
        Err(e) => return report_error(global, &e),
    };
    let report = BeltReport {
        background: engine.background(),
        background_sigma: engine.settings().background_sigma,
        confidence_level: engine.confidence_level(),
        max_count: engine.max_count(),
        empty_bands: engine.empty_band_count(),
        rows: engine.belt_rows(),
    };
    emit(global, &report)
}

fn run_bayes(global: &GlobalOpts, args: &BayesArgs) -> ExitCode {
    let (settings, _) = match load_settings(global) {
        Ok(loaded) => loaded,
        Err(e) => return report_settings_error(global, &e),
    };
    let mut bayes = settings.bayesian;
    args.overrides.apply(
        &mut bayes.confidence_level,
        &mut bayes.background_sigma,
        &mut bayes.grid,
    );
    if args.one_sided {
        bayes.one_sided = true;
    }

    let result = BayesianEngine::new(bayes).and_then(|engine| {
        let limit = engine.limit(args.observed, args.background)?;
        Ok(BayesReport {
            observed: args.observed,
            background: args.background,
            background_sigma: engine.settings().background_sigma,
            confidence_level: engine.settings().confidence_level,
            limit,
        })
    });
    match result {
        Ok(report) => {
            info!(limit = ?report.limit, "bayesian limit");
            emit(global, &report)
        }
        Err(e) => report_error(global, &e),
    }
}

fn run_zero_bg(global: &GlobalOpts, args: &ZeroBgArgs) -> ExitCode {
    let result = poisson_zero_background(args.atoms, args.live_time, args.efficiency, args.cl)
        .and_then(|lifetime_limit| {
            let lifetime_from_counts = args
                .counts
                .map(|c| counts_to_lifetime(args.atoms, args.live_time, args.efficiency, c))
                .transpose()?;
            Ok(ZeroBackgroundReport {
                n_atoms: args.atoms,
                live_time: args.live_time,
                efficiency: args.efficiency,
                confidence_level: args.cl,
                lifetime_limit,
                lifetime_from_counts,
            })
        });
    match result {
        Ok(report) => emit(global, &report),
        Err(e) => report_error(global, &e),
    }
}

#[derive(Serialize)]
struct SettingsCheck {
    status: &'static str,
    source: String,
    path: Option<PathBuf>,
    settings: Settings,
}

impl Summary for SettingsCheck {
    fn summary(&self) -> String {
        match &self.path {
            Some(path) => format!("settings ok: {} ({})", path.display(), self.source),
            None => format!("settings ok: {}", self.source),
        }
    }
}

fn run_check_settings(global: &GlobalOpts) -> ExitCode {
    match load_settings(global) {
        Ok((settings, resolved)) => emit(
            global,
            &SettingsCheck {
                status: "ok",
                source: resolved.source.to_string(),
                path: resolved.path,
                settings,
            },
        ),
        Err(e) => report_settings_error(global, &e),
    }
}

fn emit<T: Serialize + Summary>(global: &GlobalOpts, payload: &T) -> ExitCode {
    match render(payload, global.format) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::Success
        }
        Err(e) => {
            eprintln!("failed to serialize output: {}", e);
            ExitCode::InternalError
        }
    }
}

fn report_settings_error(global: &GlobalOpts, error: &ValidationError) -> ExitCode {
    write_error(global, error.code(), &error.to_string());
    ExitCode::SettingsError
}

fn report_error(global: &GlobalOpts, error: &IntervalError) -> ExitCode {
    write_error(global, error.code(), &error.to_string());
    ExitCode::for_error(error)
}

fn write_error(global: &GlobalOpts, code: u32, message: &str) {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "error",
                "error": { "code": code, "message": message },
            });
            eprintln!("{}", response);
        }
        OutputFormat::Summary => eprintln!("error [{}]: {}", code, message),
    }
}
