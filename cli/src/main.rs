use clap::Parser;
use planlog_cli::commands::{cli, logs, plan};
use planlog_core::api::{AppConfig, CliError, PlanError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let mut cfg = load_config(&args)?;
    args.apply_overrides(&mut cfg);
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    let plans =
        planlog_plugins::factory::build_plans(&cfg).map_err(|e| CliError::Config(e.to_string()))?;

    dispatch(args.command, &plans).await?;
    Ok(0)
}

fn load_config(args: &cli::Args) -> Result<AppConfig, CliError> {
    let loaded = match args.config.as_deref() {
        Some(path) => planlog_core::config::load_from_path(std::path::Path::new(path)),
        None => planlog_core::config::load_default(),
    };
    loaded.map_err(|e| CliError::Config(e.to_string()))
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 2: invalid input
    // 11: config error
    // 20: transport / IO error
    // 30: plan not found or without a log
    // 130: interrupted
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Plan(pe) => match pe {
            PlanError::InvalidPlanId => 2,
            PlanError::NotFound { .. } => 30,
            PlanError::MissingLogUrl { .. } => 30,
            PlanError::InvalidLogUrl { .. } => 20,
            PlanError::Transport(_) => 20,
            PlanError::Io(_) => 20,
            PlanError::Parse(_) => 50,
            PlanError::Cancelled => 130,
            PlanError::ReaderFailed => 50,
        },
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(cmd: cli::Commands, plans: &planlog_core::api::Plans) -> Result<(), CliError> {
    match cmd {
        cli::Commands::Logs(args) => {
            let cancel = logs::cancel_on_ctrl_c();
            let mut stdout = tokio::io::stdout();
            logs::stream_logs(plans, &args.plan_id, cancel, &mut stdout).await?;
        }
        cli::Commands::Show(args) => {
            let mut stdout = std::io::stdout().lock();
            plan::show(plans, &args.plan_id, &mut stdout).await?;
        }
        cli::Commands::JsonOutput(args) => {
            let mut stdout = std::io::stdout().lock();
            plan::json_output(plans, &args.plan_id, &mut stdout).await?;
        }
        cli::Commands::ResourceChanges(args) => {
            let mut stdout = std::io::stdout().lock();
            plan::resource_changes(plans, &args.plan_id, &mut stdout).await?;
        }
    }
    Ok(())
}

fn init_tracing(logging: &planlog_core::api::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("planlog"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("planlog.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    // Log output goes to stderr so stdout carries only the plan log.
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
