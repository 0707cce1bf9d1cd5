//! Packrig CLI entry point.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use packrig::cli::{Cli, CommandDispatcher};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("packrig=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("packrig=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("Packrig starting with args: {:?}", cli);

    let project_root = cli
        .project
        .as_ref()
        .cloned()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    let dispatcher = CommandDispatcher::new(project_root);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(&dispatcher, &cli, &mut out) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(dispatcher: &CommandDispatcher, cli: &Cli, out: &mut dyn Write) -> packrig::Result<u8> {
    let result = dispatcher.dispatch(cli, out)?;
    out.flush()?;
    Ok(result.exit_code as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenFlush(Vec<u8>);

    impl Write for BrokenFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
        }
    }

    #[test]
    fn flush_failure_is_an_error() {
        let cli = Cli::parse_from(["packrig", "schema"]);
        let dispatcher = CommandDispatcher::new(std::env::temp_dir());
        let mut out = BrokenFlush(Vec::new());

        let err = run(&dispatcher, &cli, &mut out).unwrap_err();

        assert!(matches!(err, packrig::PackrigError::Io(_)));
        assert!(!out.0.is_empty());
    }

    #[test]
    fn run_returns_command_exit_code() {
        let cli = Cli::parse_from(["packrig", "schema"]);
        let dispatcher = CommandDispatcher::new(std::env::temp_dir());
        let mut out = Vec::new();

        assert_eq!(run(&dispatcher, &cli, &mut out).unwrap(), 0);
    }
}
