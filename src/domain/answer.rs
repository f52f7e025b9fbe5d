// ============================================================
// Layer 3 — AnswerResult Domain Type
// ============================================================
// The outcome of asking one question against one context.
// Produced once per (context, question) pair and immutable
// afterwards — the history owns whatever it appends.
//
// Extractive Q&A never generates text: the answer is a literal
// span copied out of the context, identified by start/end token
// indices into the encoded input sequence. When the model fails
// (or was never loaded), the failure is reported as data via the
// `error` flag rather than as a crash of the service.

use serde::{Deserialize, Serialize};

use crate::domain::confidence::ConfidenceLevel;

/// Best-guess answer span plus a heuristic certainty signal.
///
/// `confidence` is the mean of two independent per-position
/// softmax scores — NOT a calibrated joint probability. It is
/// always in [0, 1] and `0.0` on every error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The decoded answer text, a fixed no-answer message, or a
    /// human-readable failure description when `error` is true
    pub answer: String,

    /// Mean of the start/end softmax scores, in [0, 1]
    pub confidence: f32,

    /// Index of the first answer token in the encoded input
    /// sequence (None when the call failed)
    pub start_position: Option<usize>,

    /// Index of the last answer token, inclusive
    pub end_position: Option<usize>,

    /// True when the model was unavailable or the call raised —
    /// the only error signal the caller ever sees
    pub error: bool,
}

impl AnswerResult {
    /// A successful extraction: decoded text plus its span.
    pub fn span(
        answer:     impl Into<String>,
        confidence: f32,
        start:      usize,
        end:        usize,
    ) -> Self {
        Self {
            answer:         answer.into(),
            confidence,
            start_position: Some(start),
            end_position:   Some(end),
            error:          false,
        }
    }

    /// A failed call. Confidence is pinned to 0.0 and the answer
    /// string carries the failure description.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            answer:         message.into(),
            confidence:     0.0,
            start_position: None,
            end_position:   None,
            error:          true,
        }
    }

    /// Bucket the confidence score for display.
    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    /// Length of the returned span in tokens (inclusive), if any.
    pub fn span_length(&self) -> Option<usize> {
        match (self.start_position, self.end_position) {
            (Some(s), Some(e)) => Some(e.saturating_sub(s) + 1),
            _ => None,
        }
    }
}
