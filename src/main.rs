mod cli;
mod sample_events;

use cli::{parse_cli_mode, run_agenda_mode, CliMode, USAGE};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    setup_logging();

    let options = match parse_cli_mode() {
        Ok(CliMode::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(CliMode::Agenda(options)) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{USAGE}");
            return Ok(());
        }
    };

    if let Err(e) = run_agenda_mode(options) {
        tracing::error!("Agenda failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("callback-scheduler"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "callback-scheduler.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("callback-scheduler started");
}
