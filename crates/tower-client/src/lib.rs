//! Client SDK for an automation orchestration server.
//!
//! This crate is consumed by CLI tools and pipeline adapters. It covers the
//! full lifecycle of one remote job: resolving a job template reference,
//! launching it with optional overrides, polling until the job finishes,
//! relaying streamed output events exactly once, and classifying the final
//! verdict. The only public entry point adapters need is
//! [`runner::run_job`]; the lower layers are exposed for callers that want
//! finer control (or for tests).

pub mod endpoint;
pub mod error;
pub mod job;
pub mod logs;
pub mod resolve;
pub mod runner;
pub mod transport;

pub use endpoint::{CredentialStore, MemoryCredentialStore, ServerEndpoint, ServerRecord, ServerRegistry};
pub use error::TowerError;
pub use job::{EventRecord, JobClient, JobHandle, JobRequest};
pub use logs::{LogRelay, LogSink, MemorySink, StdoutSink};
pub use resolve::{resolve, Collection};
pub use runner::{run_job, RunOptions};
pub use transport::{Method, Transport};
