mod catalog;
mod cli;
mod client;
mod config;
mod endpoint;
mod error;
mod format;
mod grammar;
mod help;
mod paths;
mod prompt;
mod router;

use std::io;
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::cli::Invocation;
use crate::prompt::StdinPrompt;

const LOG_ENV: &str = "FMCSADMIN_LOG";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_filter(env_filter);
    // Ignored when a subscriber is already installed.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut prompt = StdinPrompt;
    let mut inv = Invocation {
        defaults: config::defaults_from_env(),
        host_url: None,
        out: &mut out,
        prompt: &mut prompt,
    };
    let status = cli::run(&args, &mut inv);

    // The OS keeps only the low byte, e.g. 10001 is seen as 17.
    ExitCode::from((status & 0xff) as u8)
}
