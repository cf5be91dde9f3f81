//! Drives one job end-to-end: submit, poll on a fixed interval with log
//! relay interleaved, then classify the final verdict.

use std::time::Duration;

use crate::endpoint::ServerEndpoint;
use crate::error::TowerError;
use crate::job::{JobClient, JobRequest};
use crate::logs::{LogRelay, LogSink};
use crate::transport::Transport;

const POLL_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Log start/finish progress messages in addition to errors.
    pub verbose: bool,
    /// Relay the job's streamed events to the sink while polling.
    pub import_logs: bool,
    /// Strip ANSI color codes from relayed event lines.
    pub remove_color: bool,
    /// Wait between status polls. Tests shrink this; production callers
    /// keep the default.
    pub poll_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            import_logs: false,
            remove_color: false,
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Runs one job to completion and reports the overall verdict.
///
/// This is the entire surface adapters need: every error is caught here,
/// written to the sink as a single descriptive line, and folded into the
/// boolean result. Nothing is retried; one failed call aborts the run.
pub async fn run_job(
    endpoint: &ServerEndpoint,
    request: &JobRequest,
    options: &RunOptions,
    sink: &mut dyn LogSink,
) -> bool {
    match drive(endpoint, request, options, sink).await {
        Ok(success) => success,
        Err(err) => {
            sink.write_line(&format!("ERROR: {err}"));
            false
        }
    }
}

async fn drive(
    endpoint: &ServerEndpoint,
    request: &JobRequest,
    options: &RunOptions,
    sink: &mut dyn LogSink,
) -> Result<bool, TowerError> {
    if options.verbose {
        sink.write_line(&format!("Starting job run on {}", endpoint.base_url()));
        sink.write_line(&format!(
            "Requesting launch of job template {:?}",
            request.job_template
        ));
    }

    let transport = Transport::new(endpoint.clone())?;
    let mut client = JobClient::new(transport);
    let job = client.submit(request).await?;
    sink.write_line(&format!("Job URL: {}/#/jobs/{job}", endpoint.base_url()));

    let relay = LogRelay::new(options.remove_color);
    loop {
        // Events are drained before the completion check so output that
        // lands just as the job finishes is not lost to the race.
        if options.import_logs {
            for event in client.fetch_new_events(job).await? {
                relay.relay(&event.stdout, sink);
            }
        }
        if client.is_complete(job).await? {
            break;
        }
        tokio::time::sleep(options.poll_interval).await;
    }

    if client.is_failed(job).await? {
        sink.write_line("The server reported the job as failed");
        Ok(false)
    } else {
        if options.verbose {
            sink.write_line("The server completed the requested job");
        }
        Ok(true)
    }
}
