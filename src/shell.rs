//! Command-line front end: argv in, one resource command out.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::auth::{add_auth_token_to_kwargs, Kwargs, TokenSource, TOKEN_KEY};
use crate::commands::{OutputFormat, ResourceAction};
use crate::config::{ClientConfig, ConfigFile};
use crate::error::ClientError;
use crate::http::{BasicAuth, HttpClient, Transport};
use crate::resource::{ResourceKind, ResourceManager};

/// st2 - command-line client for the automation API
#[derive(Parser, Debug)]
#[command(name = "st2", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Access token for user authentication (overrides $ST2_AUTH_TOKEN)
    #[arg(short = 't', long, global = true)]
    pub token: Option<String>,

    /// API endpoint (overrides $ST2_API_URL and $ST2_BASE_URL)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Path to a TOML config file (overrides $ST2_CONFIG_FILE)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Enable debug logging of outgoing requests
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage actions
    Action {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage rules
    Rule {
        #[command(subcommand)]
        action: ResourceAction,
    },

    /// Manage triggers
    Trigger {
        #[command(subcommand)]
        action: ResourceAction,
    },
}

impl Commands {
    pub fn resource(&self) -> (ResourceKind, &ResourceAction) {
        match self {
            Commands::Action { action } => (ResourceKind::Action, action),
            Commands::Rule { action } => (ResourceKind::Rule, action),
            Commands::Trigger { action } => (ResourceKind::Trigger, action),
        }
    }
}

impl TokenSource for Cli {
    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Runs parsed command lines against a transport.
///
/// The environment snapshot is fixed at construction; each run resolves its
/// own token from it.
pub struct Shell<T> {
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> Shell<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Parse `argv` (program name first) and run it.
    pub fn run<I, S, W>(&self, argv: I, out: &mut W) -> Result<(), ClientError>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
        W: Write,
    {
        let cli = Cli::try_parse_from(argv)?;
        self.execute(&cli, out)
    }

    pub fn execute<W: Write>(&self, cli: &Cli, out: &mut W) -> Result<(), ClientError> {
        let path = cli.config.as_ref().or(self.config.config_file.as_ref());
        let config = match path {
            Some(path) => self.config.clone().with_file(ConfigFile::load(path)?),
            None => self.config.clone(),
        };

        let kwargs = add_auth_token_to_kwargs(cli, &config, &Kwargs::new());
        let (kind, action) = cli.command.resource();
        tracing::debug!(
            resource = %kind,
            action = action.name(),
            token = kwargs.contains_key(TOKEN_KEY),
            "running command"
        );

        let client = HttpClient::new(config.api_url(cli.url.as_deref()), &self.transport);
        let auth = config
            .credentials()
            .map(|c| BasicAuth::new(&c.username, &c.password));
        let manager = ResourceManager::new(kind, &client).with_basic_auth(auth);

        let format = if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        };
        action.run(&manager, &kwargs, format, out)
    }
}
