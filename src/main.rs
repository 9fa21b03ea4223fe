//! st2 - command-line client for the automation API
//!
//! Manages actions, rules and triggers over the REST API:
//!
//! ```text
//! st2 rule list
//! st2 rule get <name>
//! st2 rule create <file.json>
//! st2 rule update <name> <file.json>
//! st2 rule delete <name>
//! ```
//!
//! Requests carry `X-Auth-Token` when a token is given with `-t/--token`
//! or found in `$ST2_AUTH_TOKEN`.

use clap::Parser as ClapParser;
use st2client::config::ClientConfig;
use st2client::http::ReqwestTransport;
use st2client::shell::{Cli, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = ClientConfig::from_env();
    let shell = Shell::new(config, ReqwestTransport::new());

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = shell.execute(&cli, &mut stdout) {
        let (kind, action) = cli.command.resource();
        eprintln!("st2 {} {}: {}", kind, action.name(), e);
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr so it never mixes with command output.
fn init_tracing(debug: bool) {
    let default = if debug {
        "st2client=debug"
    } else {
        "st2client=warn"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
