use thiserror::Error;

/// Engine-level failures. All of these are synchronous and local; none is
/// retryable by the engine itself. Retry and backoff belong to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("exam composition produced no questions")]
    EmptyExam,

    #[error("cannot start a session without questions")]
    InvalidSession,

    #[error("question {index} has already been answered")]
    AlreadyAnswered { index: usize },

    #[error("session is already finished")]
    SessionFinished,

    #[error("session is not finished yet")]
    SessionNotFinished,

    #[error("current question must be answered before advancing")]
    AnswerRequired,

    #[error("current question must be revealed before advancing")]
    RevealRequired,

    #[error("question {id} is malformed: {reason}")]
    MalformedQuestion { id: String, reason: String },
}
