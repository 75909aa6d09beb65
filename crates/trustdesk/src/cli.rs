use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Default HTTP API port: "TRUS(T)" on a phone keypad (T=8, R=7, U=8, S=7).
pub const DEFAULT_HTTP_PORT: u16 = 8787;

#[derive(Parser, Debug)]
#[command(
    name = "trustdesk",
    version,
    about = "Certificate trust and network reachability for managed desktops"
)]
pub struct Cli {
    /// Run in daemon mode (HTTP adapter)
    #[arg(long)]
    pub daemon: bool,

    /// HTTP API port
    #[arg(long, env = "TRUSTDESK_PORT", default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Directory scanned for certificate files (default: platform data dir)
    #[arg(long, env = "TRUSTDESK_CERT_DIR", value_name = "DIR")]
    pub cert_dir: Option<PathBuf>,

    /// Domain list consulted by the reachability checker
    #[arg(long, env = "TRUSTDESK_DOMAINS_FILE", value_name = "PATH")]
    pub domains_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "TRUSTDESK_LOG", default_value = "info")]
    pub log_level: String,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to file (in addition to stderr)
    #[arg(long, env = "TRUSTDESK_LOG_FILE", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show version information
    Version,
    /// Show status of all capabilities
    Status,
    /// Certificate trust operations
    Certs(CertsCommand),
    /// Network reachability checks
    Net(NetCommand),
}

#[derive(Args, Debug)]
pub struct CertsCommand {
    #[command(subcommand)]
    pub command: CertsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CertsSubcommand {
    /// List certificates in the source directory with their trust state
    List,
    /// Probe whether a certificate file is in the system trust store
    Check {
        /// Path to a PEM certificate file
        file: PathBuf,
    },
    /// Install a certificate file into the system trust store (elevates)
    Install {
        /// Path to a PEM certificate file
        file: PathBuf,
    },
    /// Install every certificate from the source directory not yet trusted
    InstallAll,
}

#[derive(Args, Debug)]
pub struct NetCommand {
    #[command(subcommand)]
    pub command: NetSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum NetSubcommand {
    /// Print the configured domain list
    Domains,
    /// Run one reachability check against a domain or URL
    Check {
        /// Domain to ping, or a full URL with --http
        target: String,
        /// Check with an HTTP HEAD request instead of ping
        #[arg(long)]
        http: bool,
    },
}

/// Resolved configuration used at runtime.
pub struct Config {
    pub http_port: u16,
    pub cert_dir: PathBuf,
    pub domains_file: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            http_port: cli.port,
            cert_dir: cli
                .cert_dir
                .clone()
                .unwrap_or_else(trustdesk_common::paths::certs_dir),
            domains_file: cli
                .domains_file
                .clone()
                .unwrap_or_else(trustdesk_common::paths::domains_file),
        }
    }

    /// Endpoint a client would use to reach a daemon started with this
    /// configuration. The adapter binds loopback only.
    pub fn local_endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.http_port)
    }
}
