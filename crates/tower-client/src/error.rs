use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while talking to the orchestration server.
///
/// None of these are retried: a single failure aborts the current job run.
/// The run loop catches them at its boundary and turns them into one log
/// line plus a `false` result, so no variant ever crosses the adapter
/// surface.
#[derive(Debug, Error)]
pub enum TowerError {
    /// Bad base URL, unknown server name, or an unbuildable HTTP client.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The server answered 401.
    #[error("username/password invalid (server returned 401)")]
    Authentication,

    /// A 404 from the server, or a name that matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A name that matched more than one item; we fail rather than guess.
    #[error("name {0:?} is not unique")]
    AmbiguousName(String),

    /// Caught before any network call is made.
    #[error("{0}")]
    Validation(String),

    /// The server answered 400 to a launch request.
    #[error(
        "the server rejected the launch request (400); check the supplied \
         extra vars, limit, tags, inventory and credential values"
    )]
    RequestRejected,

    /// A 2xx response that is missing a field we depend on.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Any status code the operation does not know how to interpret.
    #[error("unexpected status {status} from {context}")]
    UnexpectedStatus { status: StatusCode, context: String },

    /// Connection-level failure underneath the HTTP exchange.
    #[error("unable to reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The wait between polls was cancelled by the surrounding context.
    #[error("interrupted while waiting between polls")]
    Interrupted,
}
