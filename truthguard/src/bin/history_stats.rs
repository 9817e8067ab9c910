use std::env;
use std::path::PathBuf;
use truthguard::config::DEFAULT_HISTORY_PATH;
use truthguard::history::compile;
use truthguard::telemetry::init_tracing;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let log_path =
        env::var("TRUTHGUARD_HISTORY_PATH").unwrap_or_else(|_| DEFAULT_HISTORY_PATH.to_string());
    let out_dir = env::var("TRUTHGUARD_STATS_OUT").unwrap_or_else(|_| "history_out".to_string());

    let stats = compile(PathBuf::from(&log_path), PathBuf::from(&out_dir))?;
    tracing::info!(
        log = %log_path,
        out = %out_dir,
        checks = stats.total_checks,
        fake = stats.fake_count,
        "history stats compiled"
    );
    Ok(())
}
