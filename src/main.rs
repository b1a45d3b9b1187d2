//! Service access strategy checker
//!
//! Evaluates a service's access policy against a principal's attributes.

use clap::Parser;
use service_access::{
    access_strategy::{AccessPolicy, AccessStrategy},
    config::{LogFormat, LoggingConfig, load_config},
    input::{merge_attributes, parse_attribute_pairs, read_attributes_file},
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Check whether a principal may access a registered service
#[derive(Parser, Debug)]
#[command(name = "service-access")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file holding the service policy
    #[arg(short, long, env = "SERVICE_ACCESS_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(long, env = "SERVICE_ACCESS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Principal identifier
    #[arg(short, long)]
    principal: String,

    /// JSON file with the principal's attributes
    #[arg(long)]
    attributes_file: Option<PathBuf>,

    /// Principal attribute as name=value; repeat a name for multiple values
    #[arg(short = 'a', long = "attr")]
    attrs: Vec<String>,
}

fn init_logging(logging: &LoggingConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(&logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match logging.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    Ok(run(Args::parse())?)
}

fn run(args: Args) -> service_access::Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        principal = %args.principal,
        "Evaluating service access"
    );

    let from_file = match &args.attributes_file {
        Some(path) => read_attributes_file(path).inspect_err(
            |e| error!(error = %e, path = %path.display(), "Failed to read attributes"),
        )?,
        None => Default::default(),
    };
    let from_args = parse_attribute_pairs(args.attrs.as_slice())
        .inspect_err(|e| error!(error = %e, "Failed to parse attributes"))?;
    let attributes = merge_attributes(from_file, from_args);

    let policy = AccessPolicy::from_definition(config.policy);

    if !policy.is_service_access_allowed() {
        println!("DENIED: service is not enabled");
        return Ok(ExitCode::FAILURE);
    }

    if !policy.do_principal_attributes_allow_service_access(&args.principal, &attributes) {
        match policy.unauthorized_redirect_url() {
            Some(url) => println!("DENIED: redirect to {}", url),
            None => println!("DENIED"),
        }
        return Ok(ExitCode::FAILURE);
    }

    let sso = if policy.is_service_access_allowed_for_sso() {
        "sso allowed"
    } else {
        "sso not allowed"
    };
    println!("ALLOWED ({})", sso);
    Ok(ExitCode::SUCCESS)
}
