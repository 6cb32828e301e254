//! Reads a scenario tree from stdin, parses it into a dependency graph, and
//! drives it to completion. One invocation, no subcommands:
//!
//! ```text
//! orchestrator --workers 4 --debug < scenario.json
//! ```

use std::io;
use std::process::ExitCode;

use clap::Parser;

/// A small declarative orchestrator: feed it a scenario tree on stdin, it
/// sets up every object in dependency order and reports what happened.
#[derive(Parser)]
#[command(name = "orchestrator")]
struct Opt {
    /// Number of worker threads to dispatch object setup to concurrently.
    /// Defaults to the number of logical CPUs.
    #[arg(long)]
    workers: Option<usize>,

    /// Enable verbose (debug-level) logging.
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let opt = Opt::parse();

    let level = if opt.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .init();

    let objects = match scenario::parse(io::stdin().lock()) {
        Ok(objects) => objects,
        Err(e) => {
            log::error!("error: cannot accept scenario: {e}");
            return ExitCode::FAILURE;
        }
    };

    let workers = opt.workers.unwrap_or_else(num_cpus::get);
    let report = scheduler::Scheduler::new(workers).run(&objects);

    for name in &report.created {
        log::debug!("{name}: created");
    }
    for (name, reason) in &report.failed {
        log::error!("{name}: setup failed: {reason}");
    }
    for (name, reason) in &report.unresolved {
        log::error!("{name}: unresolved: {reason}");
    }
    for name in &report.stalled {
        log::error!("{name}: stalled -- likely a dependency cycle");
    }

    if report.has_problems() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::Opt;
    use clap::Parser;

    #[test]
    fn defaults_to_no_debug_and_no_explicit_worker_count() {
        let opt = Opt::try_parse_from(["orchestrator"]).unwrap();
        assert!(!opt.debug);
        assert_eq!(opt.workers, None);
    }

    #[test]
    fn accepts_workers_and_debug_flags() {
        let opt = Opt::try_parse_from(["orchestrator", "--workers", "8", "--debug"]).unwrap();
        assert!(opt.debug);
        assert_eq!(opt.workers, Some(8));
    }
}
