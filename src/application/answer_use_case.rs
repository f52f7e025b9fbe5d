// ============================================================
// Layer 2 — Answer Use Case
// ============================================================
// Wires the model store to the extraction engine and exposes
// the two things the CLI needs: a one-shot answer, and a chat
// session built around the same loaded engine.
//
// Loading happens exactly once, here. Whether it succeeded is
// part of the engine's state, so construction itself cannot
// fail — a missing model directory shows up as error results,
// exactly like it did at call time in the original.

use crate::application::session::ChatSession;
use crate::domain::answer::AnswerResult;
use crate::domain::traits::AnswerExtractor;
use crate::infra::model_store::ModelStore;
use crate::ml::extractor::QaEngine;

/// Everything the use case needs to know, already separated
/// from the clap argument types.
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    pub model_dir:      String,
    pub max_answer_len: usize,
}

pub struct AnswerUseCase {
    engine:         QaEngine,
    max_answer_len: usize,
}

impl AnswerUseCase {
    pub fn new(config: AnswerConfig) -> Self {
        let store = ModelStore::new(&config.model_dir);
        Self {
            engine:         QaEngine::load(&store),
            max_answer_len: config.max_answer_len,
        }
    }

    /// False when the model assets failed to load at startup.
    pub fn is_ready(&self) -> bool {
        self.engine.is_ready()
    }

    /// Answer a single question against a single context.
    pub fn answer(&self, context: &str, question: &str) -> AnswerResult {
        self.engine.extract(context, question, self.max_answer_len)
    }

    /// Hand the loaded engine over to an interactive session.
    pub fn into_session(self) -> ChatSession<QaEngine> {
        ChatSession::new(self.engine, self.max_answer_len)
    }
}
