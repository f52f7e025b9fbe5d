// ============================================================
// Layer 3 — Exchange Domain Type
// ============================================================
// One completed question/answer round in a chat session.
// The history is just an ordered Vec of these — identity is
// insertion order, nothing more.

use chrono::{DateTime, Local};

use crate::domain::answer::AnswerResult;

/// A question together with the result it produced and the wall
/// clock time it was asked at (shown as HH:MM:SS in the chat).
#[derive(Debug, Clone)]
pub struct Exchange {
    pub question: String,
    pub result:   AnswerResult,
    pub asked_at: DateTime<Local>,
}

impl Exchange {
    /// Stamp a new exchange with the current local time.
    pub fn new(question: impl Into<String>, result: AnswerResult) -> Self {
        Self {
            question: question.into(),
            result,
            asked_at: Local::now(),
        }
    }

    /// Timestamp formatted the way the chat transcript shows it.
    pub fn timestamp(&self) -> String {
        self.asked_at.format("%H:%M:%S").to_string()
    }
}
