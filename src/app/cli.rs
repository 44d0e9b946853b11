use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tracing::{info, warn};

use super::error::AppError;

/// Exit code for a successful run
pub const EXIT_OK: i32 = 0;
/// Exit code for a run that returned an error
pub const EXIT_FAILURE: i32 = 1;

/// Reusable CLI application runner that handles:
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Stdout buffering
/// - Exit codes (0 = success, 1 = error, 130 = SIGINT, 143 = SIGTERM, 129 = SIGHUP)
pub struct CliApp {
    name: String,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the application and exit the process with the resulting code
    ///
    /// The main function receives a buffered stdout writer and is responsible
    /// for flushing it.
    pub async fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(BufWriter<Stdout>) -> Fut,
        Fut: Future<Output = Result<(), AppError>>,
    {
        let writer = BufWriter::new(tokio::io::stdout());
        let code = self.execute(main_fn(writer), wait_for_signal()).await;
        std::process::exit(code);
    }

    /// Race the application future against a shutdown signal and map the
    /// outcome to an exit code
    pub async fn execute<Fut, Sig>(&self, work: Fut, signal: Sig) -> i32
    where
        Fut: Future<Output = Result<(), AppError>>,
        Sig: Future<Output = i32>,
    {
        tokio::select! {
            result = work => match result {
                Ok(()) => EXIT_OK,
                Err(e) => {
                    eprintln!("{}: {}", self.name, e);
                    EXIT_FAILURE
                }
            },
            code = signal => {
                info!(app = %self.name, code, "Interrupted by signal");
                code
            }
        }
    }
}

/// Wait for SIGINT, SIGTERM or SIGHUP (Ctrl+C elsewhere) and return the
/// conventional `128 + signo` exit code
pub async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
            signal(SignalKind::hangup()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint), Ok(mut sighup)) => {
                tokio::select! {
                    _ = sigterm.recv() => 143,
                    _ = sigint.recv() => 130,
                    _ = sighup.recv() => 129,
                }
            }
            _ => {
                warn!("Failed to install signal handlers");
                std::future::pending().await
            }
        }
    }

    #[cfg(not(unix))]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => 130,
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending().await
            }
        }
    }
}
