// ============================================================
// Layer 2 — Chat Session
// ============================================================
// Owns what the UI used to keep in page state: the current
// context passage, the ordered history of exchanges, and the
// running session statistics. Strictly single-threaded and
// synchronous — one question produces one blocking extraction
// call, and nothing here is shared.
//
// The non-empty preconditions live HERE, not in the extraction
// service: the service answers whatever it is given, and this
// layer is responsible for rejecting blank input before the
// model ever sees it.

use crate::domain::answer::AnswerResult;
use crate::domain::exchange::Exchange;
use crate::domain::traits::AnswerExtractor;

/// Why a question was rejected before reaching the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskRejection {
    /// No context passage has been provided yet
    MissingContext,
    /// The question was empty or whitespace-only
    EmptyQuestion,
}

impl AskRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingContext => "Please provide a context first!",
            Self::EmptyQuestion  => "Please enter a question!",
        }
    }
}

/// Aggregate numbers over the session history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub questions:       usize,
    pub mean_confidence: f32,
}

/// One user's conversation: a context passage plus everything
/// asked against it so far.
pub struct ChatSession<E: AnswerExtractor> {
    extractor:      E,
    context:        String,
    max_answer_len: usize,
    history:        Vec<Exchange>,
}

impl<E: AnswerExtractor> ChatSession<E> {
    pub fn new(extractor: E, max_answer_len: usize) -> Self {
        Self {
            extractor,
            context: String::new(),
            max_answer_len,
            history: Vec::new(),
        }
    }

    /// Replace the context passage. The history is kept — the
    /// original UI let users switch passages mid-conversation.
    pub fn set_context(&mut self, text: impl Into<String>) {
        self.context = text.into();
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn has_context(&self) -> bool {
        !self.context.trim().is_empty()
    }

    /// Validate, extract, and append to the history. Returns the
    /// completed exchange for immediate display. Model failures
    /// do NOT come back as `Err` — they are ordinary exchanges
    /// whose result carries the error flag.
    pub fn ask(&mut self, question: &str) -> Result<Exchange, AskRejection> {
        if !self.has_context() {
            return Err(AskRejection::MissingContext);
        }
        let question = question.trim();
        if question.is_empty() {
            return Err(AskRejection::EmptyQuestion);
        }

        let result: AnswerResult =
            self.extractor.extract(&self.context, question, self.max_answer_len);
        let exchange = Exchange::new(question, result);
        self.history.push(exchange.clone());
        Ok(exchange)
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Questions asked and mean confidence across all of them
    /// (error results count with their 0.0 confidence, as the
    /// original stats did).
    pub fn stats(&self) -> SessionStats {
        let questions = self.history.len();
        let mean_confidence = if questions == 0 {
            0.0
        } else {
            self.history.iter().map(|ex| ex.result.confidence).sum::<f32>() / questions as f32
        };
        SessionStats { questions, mean_confidence }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Canned extractor that counts how often it was called.
    struct Stub {
        confidence: f32,
        calls:      Cell<usize>,
    }

    impl Stub {
        fn new(confidence: f32) -> Self {
            Self { confidence, calls: Cell::new(0) }
        }
    }

    impl AnswerExtractor for Stub {
        fn extract(&self, _context: &str, question: &str, _max: usize) -> AnswerResult {
            self.calls.set(self.calls.get() + 1);
            AnswerResult::span(format!("answer to '{question}'"), self.confidence, 0, 1)
        }
    }

    #[test]
    fn rejects_questions_without_a_context() {
        let mut session = ChatSession::new(Stub::new(0.9), 100);
        assert_eq!(session.ask("why?").unwrap_err(), AskRejection::MissingContext);
        // Whitespace-only context counts as missing
        session.set_context("   \n  ");
        assert_eq!(session.ask("why?").unwrap_err(), AskRejection::MissingContext);
        // The model must never have been consulted
        assert_eq!(session.extractor.calls.get(), 0);
        assert!(session.history().is_empty());
    }

    #[test]
    fn rejects_blank_questions() {
        let mut session = ChatSession::new(Stub::new(0.9), 100);
        session.set_context("Paris is the capital of France.");
        assert_eq!(session.ask("   ").unwrap_err(), AskRejection::EmptyQuestion);
        assert_eq!(session.extractor.calls.get(), 0);
    }

    #[test]
    fn asking_appends_to_the_history_in_order() {
        let mut session = ChatSession::new(Stub::new(0.9), 100);
        session.set_context("Paris is the capital of France.");

        let ex = session.ask("  What is the capital?  ").unwrap();
        assert_eq!(ex.question, "What is the capital?");
        assert!(!ex.result.error);

        session.ask("Second question?").unwrap();
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].question, "Second question?");
    }

    #[test]
    fn clear_empties_the_history_but_keeps_the_context() {
        let mut session = ChatSession::new(Stub::new(0.9), 100);
        session.set_context("Some passage.");
        session.ask("one?").unwrap();
        session.clear_history();
        assert!(session.history().is_empty());
        assert!(session.has_context());
    }

    #[test]
    fn stats_average_over_all_exchanges() {
        let mut session = ChatSession::new(Stub::new(0.5), 100);
        assert_eq!(session.stats().questions, 0);
        assert_eq!(session.stats().mean_confidence, 0.0);

        session.set_context("Some passage.");
        session.ask("one?").unwrap();
        session.ask("two?").unwrap();

        let stats = session.stats();
        assert_eq!(stats.questions, 2);
        assert!((stats.mean_confidence - 0.5).abs() < 1e-6);
    }
}
