use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tower-run")]
#[command(about = "Launch a job template on an automation orchestration server and track it to completion")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch a job template and wait for its verdict
    Run {
        /// Configured server name (see TOWER_SERVERS)
        #[arg(short, long)]
        server: String,

        /// Job template id or name
        #[arg(short = 't', long)]
        job_template: String,

        /// Extra variables document passed to the job verbatim
        #[arg(long, default_value = "")]
        extra_vars: String,

        /// Host pattern limiting which managed hosts the run applies to
        #[arg(long, default_value = "")]
        limit: String,

        /// Job tags
        #[arg(long, default_value = "")]
        job_tags: String,

        /// Inventory id or name
        #[arg(long, default_value = "")]
        inventory: String,

        /// Machine credential id or name
        #[arg(long, default_value = "")]
        credential: String,

        /// Log progress messages in addition to errors
        #[arg(short, long)]
        verbose: bool,

        /// Relay the job's streamed output while polling
        #[arg(long)]
        import_logs: bool,

        /// Strip ANSI color codes from relayed output
        #[arg(long)]
        remove_color: bool,
    },

    /// Test connectivity against a configured server
    Ping {
        /// Configured server name (see TOWER_SERVERS)
        #[arg(short, long)]
        server: String,
    },
}
