//! wsline entry point.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a local echo server
//! wsline ws://localhost:8080/echo
//!
//! # Multi-line messages, custom origin and an auth header
//! wsline -m -o https://app.example.com -H "Authorization: Bearer t" wss://api.example.com/ws
//! ```

use std::{
    env,
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wsline::{ClientConfig, ConfigError, RawModeWriter, config};
use wsline_session::ReadMode;

/// Interactive WebSocket client
#[derive(Parser, Debug)]
#[command(name = "wsline")]
#[command(about = "Send lines typed in the terminal over a WebSocket and print what comes back")]
#[command(version)]
struct Args {
    /// WebSocket URL (ws://, wss://, http:// or https://)
    url: String,

    /// Origin header value (default derived from the URL)
    #[arg(short, long)]
    origin: Option<String>,

    /// Send multi-line messages, ended by a blank line
    #[arg(short, long)]
    multiline: bool,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Extra handshake header, "Name: Value" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    headers: Vec<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log level (trace, debug, info, warn, error)
    ///
    /// Logs go to stderr and share the screen with the prompt; redirect
    /// stderr to a file to keep the prompt line intact.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Result<ClientConfig, ConfigError> {
        let mut config = self
            .headers
            .iter()
            .try_fold(ClientConfig::new(self.url, self.origin)?, |config, raw| {
                config.with_header(raw)
            })?;

        config.read_mode = if self.multiline { ReadMode::MultiLine } else { ReadMode::SingleLine };
        config.color = config::color_enabled(self.no_color, env::var_os("NO_COLOR").as_deref());
        config.insecure = self.insecure;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(|| RawModeWriter::new(io::stderr())))
        .with(filter)
        .init();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => return report(&e),
    };

    tracing::info!(url = %config.url, origin = %config.origin, "connecting");
    let condition = wsline::run(&config).await;

    if condition.is_clean_exit() {
        tracing::info!(%condition, "session ended");
        ExitCode::SUCCESS
    } else {
        report(&condition)
    }
}

/// Print a fatal error and pick the failure exit code.
fn report(error: &dyn std::error::Error) -> ExitCode {
    let _ = writeln!(io::stderr(), "wsline: {error}");
    ExitCode::FAILURE
}
