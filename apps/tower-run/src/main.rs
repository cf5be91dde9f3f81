mod cli;
mod config;

use clap::Parser;
use tracing::error;

use tower_client::{run_job, JobRequest, RunOptions, StdoutSink, Transport};

use crate::cli::{Cli, Commands};
use crate::config::Config;

#[tokio::main]
async fn main() {
    // Default to WARN when RUST_LOG is not set.
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Ping { server } => {
            let endpoint = match config.registry.endpoint(&server, &config.credentials) {
                Ok(endpoint) => endpoint,
                Err(err) => {
                    error!("{err}");
                    std::process::exit(1);
                }
            };
            let transport = match Transport::new(endpoint) {
                Ok(transport) => transport,
                Err(err) => {
                    error!("{err}");
                    std::process::exit(1);
                }
            };
            match transport.ping().await {
                Ok(()) => println!("{server}: ok"),
                Err(err) => {
                    error!("{server}: {err}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Run {
            server,
            job_template,
            extra_vars,
            limit,
            job_tags,
            inventory,
            credential,
            verbose,
            import_logs,
            remove_color,
        } => {
            let endpoint = match config.registry.endpoint(&server, &config.credentials) {
                Ok(endpoint) => endpoint.with_debug(verbose),
                Err(err) => {
                    error!("{err}");
                    std::process::exit(1);
                }
            };
            let request = JobRequest {
                job_template,
                extra_vars,
                limit,
                job_tags,
                inventory,
                credential,
            };
            let options = RunOptions {
                verbose,
                import_logs,
                remove_color,
                ..RunOptions::default()
            };

            let mut sink = StdoutSink;
            if !run_job(&endpoint, &request, &options, &mut sink).await {
                std::process::exit(1);
            }
        }
    }
}
