//! path-acl command line
//!
//! `serve` runs the ACL-guarded HTTP server; `check` evaluates a single
//! request against the configured ACL; `dump` prints the effective ACL.

use clap::{Parser, Subcommand};
use path_acl::{
    access_control::{AccessRequest, Acl, Decision},
    config::{AppConfig, LogFormat, load_config},
    run_server,
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Path-pattern access control for HTTP services
#[derive(Parser, Debug)]
#[command(name = "path-acl")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "PATH_ACL_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PATH_ACL_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve an HTTP app guarded by the ACL
    Serve {
        /// Host to bind to (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Evaluate one request and print the decision
    Check {
        /// Request path
        #[arg(long)]
        path: String,

        /// Request method, any case
        #[arg(long, default_value = "GET")]
        method: String,

        /// Caller role; omit for an unauthenticated request
        #[arg(long)]
        role: Option<String>,
    },

    /// Print the effective roles and resources as TOML
    Dump,
}

/// Output of the `check` command
#[derive(Serialize)]
struct CheckOutput<'a> {
    path: &'a str,
    method: &'a str,
    role: Option<&'a str>,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

fn init_logging(config: &AppConfig, cli_level: Option<&str>) {
    let level = cli_level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

fn check(acl: &Acl, path: &str, method: &str, role: Option<&str>) -> anyhow::Result<bool> {
    let decision = acl.authorize(&AccessRequest::new(path, method, role));
    let reason = decision.reason();

    let output = CheckOutput {
        path,
        method,
        role,
        allowed: decision == Decision::Allow,
        reason: reason.map(|r| r.code()),
        message: reason.map(|r| r.message()),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(decision.is_allowed())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Config is needed to pick the log format, so it loads before logging starts
    let mut config = load_config(args.config.as_deref())
        .inspect_err(|e| eprintln!("Failed to load configuration: {}", e))?;

    init_logging(&config, args.log_level.as_deref());

    match args.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            info!(
                version = env!("CARGO_PKG_VERSION"),
                roles = config.acl.roles.len(),
                resources = config.acl.resources.len(),
                "Starting path-acl server"
            );

            run_server(&config)
                .await
                .inspect_err(|e| error!(error = %e, "Server failed"))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path, method, role } => {
            let acl = Acl::from_config(&config.acl)
                .inspect_err(|e| error!(error = %e, "Failed to build ACL"))?;

            if check(&acl, &path, &method, role.as_deref())? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Dump => {
            print!("{}", toml::to_string_pretty(&config.acl)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
