use thiserror::Error;

/// Failure talking to the chat completion API.
///
/// Never surfaced to clients directly; `AiService` turns it into a fallback payload.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key is configured.
    #[error("AI API key is not configured")]
    NotConfigured,

    /// Transport failure or undecodable body.
    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API answered with a non-success status.
    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Completion contained no message content.
    #[error("AI service returned an empty completion")]
    EmptyCompletion,
}
