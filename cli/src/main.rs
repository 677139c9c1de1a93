/*!

This is the command line interface for the auto scaling group end-to-end harness. It bootstraps
and cleans up the cloud prerequisites, shows the replacement values and rendered manifests the
scenarios use, and waits on custom resource conditions.

!*/

mod bootstrap;
mod cleanup;
mod render;
mod replacements;
mod wait;

use anyhow::Result;
use asg_test_bootstrap::constants::BOOTSTRAP_FAILURE_EXIT_CODE;
use asg_test_bootstrap::BootstrapError;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use std::path::PathBuf;

/// The command line interface for the auto scaling group end-to-end harness.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// Path to the kubeconfig file. Also can be passed with the KUBECONFIG environment variable.
    #[clap(long = "kubeconfig")]
    kubeconfig: Option<PathBuf>,
    /// The directory holding the bootstrap descriptor.
    #[clap(long = "bootstrap-dir", env = "ASG_E2E_BOOTSTRAP_DIR", default_value = ".")]
    bootstrap_dir: PathBuf,
    /// The AWS region. Defaults to us-west-2.
    #[clap(long = "region", env = "ASG_E2E_REGION")]
    region: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Create the cloud prerequisites and write the bootstrap descriptor.
    Bootstrap(bootstrap::Bootstrap),
    /// Remove the bootstrapped cloud prerequisites, best-effort.
    Cleanup(cleanup::Cleanup),
    /// Print the manifest replacement values.
    Replacements(replacements::Replacements),
    /// Render a manifest template.
    Render(render::Render),
    /// Wait for a condition on an auto scaling group custom resource.
    Wait(wait::Wait),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(args.log_level);
    if let Err(e) = run(args).await {
        eprintln!("{:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Bootstrap(bootstrap) => bootstrap.run(&args.bootstrap_dir, &args.region).await,
        Command::Cleanup(cleanup) => cleanup.run(&args.bootstrap_dir, &args.region).await,
        Command::Replacements(replacements) => replacements.run(&args.bootstrap_dir),
        Command::Render(render) => render.run(&args.bootstrap_dir),
        Command::Wait(wait) => wait.run(args.kubeconfig.as_deref()).await,
    }
}

/// Bootstrap failures get their own exit code so suite runners can tell them apart.
fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<BootstrapError>().is_some() {
        BOOTSTRAP_FAILURE_EXIT_CODE
    } else {
        1
    }
}

/// Initialize the logger with the value passed by `--log-level` (or its default) when the
/// `RUST_LOG` environment variable is not present. If present, the `RUST_LOG` environment variable
/// overrides `--log-level`/`level`.
fn init_logger(level: LevelFilter) {
    match std::env::var(env_logger::DEFAULT_FILTER_ENV).ok() {
        Some(_) => {
            // RUST_LOG exists; env_logger will use it.
            Builder::from_default_env().init();
        }
        None => {
            // RUST_LOG does not exist; use default log level for the harness crates only. The
            // filter is a prefix, so `asg_test` also matches `asg_test_model` and friends.
            Builder::new().filter(Some("asg_test"), level).init();
        }
    }
}
