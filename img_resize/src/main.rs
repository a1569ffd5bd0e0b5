use clap::Parser;
use img_resize::{filter_injected_flags, run, Cli, JobConfig};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::RunLog;

fn main() -> anyhow::Result<()> {
    let _ = init_logging("img_resize", LogConfig::default());

    let args = filter_injected_flags(std::env::args());
    let cli = Cli::parse_from(args);

    let mut log = RunLog::session_header("img-resize");
    let config = JobConfig::resolve(&cli, &mut log);

    if let Err(e) = run(&config, &mut log) {
        // Fatal only for a missing directory or an empty match set; the
        // run ends with a message and no further side effects.
        eprintln!("❌ {}", e);
    }

    Ok(())
}
