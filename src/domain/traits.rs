// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types, the
// layers above never see the model framework. The chat session
// only knows "something that maps (context, question) to an
// AnswerResult" — in production that is the burn-backed engine,
// in tests it is a canned stub.

use crate::domain::answer::AnswerResult;

// ─── AnswerExtractor ──────────────────────────────────────────────────────────
/// Any component that can extract an answer span for a question
/// from a context passage.
///
/// Implementations:
///   - ml::extractor::QaEngine → the pretrained span model
///   - test stubs              → canned results, no model needed
pub trait AnswerExtractor {
    /// Map (context, question) to a result. This call NEVER
    /// fails: model unavailability and per-call exceptions are
    /// reported inside the result via its `error` flag, so the
    /// caller has exactly one path to handle.
    ///
    /// `max_answer_len` bounds the returned span, in tokens.
    fn extract(&self, context: &str, question: &str, max_answer_len: usize) -> AnswerResult;
}
