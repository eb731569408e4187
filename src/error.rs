use thiserror::Error;

/// Errors raised by the widget when the host drives it out of contract.
#[derive(Debug, Error, PartialEq)]
pub enum WidgetError {
    #[error("cannot {action} while the widget is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("no question at index {0}")]
    UnknownQuestion(usize),

    #[error("question {question} does not accept a {response} response")]
    ResponseMismatch {
        question: String,
        response: &'static str,
    },

    #[error("level {level} is out of range for a {levels}-level question")]
    LevelOutOfRange { level: usize, levels: usize },
}

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("collector unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("collector responded with status {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to encode field {field}: {source}")]
    Encode {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("vote memory I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("vote memory is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
