// ============================================================
// Layer 5 — Answer Extraction Service
// ============================================================
// Maps (context, question) to an AnswerResult using the
// pretrained span model. The whole pipeline for one call:
//
//   encode   [CLS] question [SEP] context [SEP], trimmed to the
//            model's sequence limit (longest side first)
//   forward  one pass → start-likelihood and end-likelihood
//            vectors over token positions
//   select   argmax of each vector INDEPENDENTLY — no joint
//            search over valid (start, end) pairs. A joint
//            search can find better spans; the independent pick
//            is the inherited behaviour and replacing it would
//            change observable answers.
//   clamp    end < start collapses to the start token; spans
//            longer than max_answer_len are truncated
//   decode   token span back to text, special tokens stripped
//   score    mean of the two softmax values at the chosen
//            positions — a heuristic, not a probability
//
// The engine never fails as a call. A model that didn't load
// and an exception mid-pipeline both come back as an
// AnswerResult with `error: true` and zero confidence.

use anyhow::Result;
use burn::prelude::*;
use burn::tensor::TensorData;
use tokenizers::Tokenizer;

use crate::domain::answer::AnswerResult;
use crate::domain::traits::AnswerExtractor;
use crate::infra::model_store::ModelStore;
use crate::ml::model::SpanQaModel;

type InferBackend = burn::backend::NdArray;
type InferDevice = <InferBackend as Backend>::Device;

/// Substituted when the decoded span is empty or whitespace.
pub const NO_ANSWER_MESSAGE: &str = "I couldn't find a clear answer in the context.";

/// Default bound on the answer span, in tokens.
pub const DEFAULT_MAX_ANSWER_LEN: usize = 100;

/// The process-wide extraction service. Loaded once at startup;
/// read-only afterwards, so one instance serves every call of
/// the session.
pub struct QaEngine {
    state: EngineState,
}

enum EngineState {
    Ready(SpanPredictor),
    /// Assets failed to load. Permanent for the process lifetime
    /// — every call answers with an error result.
    Unavailable(String),
}

impl QaEngine {
    /// Load model, tokenizer, and config from the store. This
    /// never returns an error: a failed load is captured as the
    /// engine's permanent unavailable state instead, so callers
    /// hold an engine either way.
    pub fn load(store: &ModelStore) -> Self {
        let state = match SpanPredictor::load(store) {
            Ok(predictor) => {
                tracing::info!("QA engine ready (model dir '{}')", store.dir().display());
                EngineState::Ready(predictor)
            }
            Err(e) => {
                tracing::error!("QA engine unavailable: {e:#}");
                EngineState::Unavailable(format!("{e:#}"))
            }
        };
        Self { state }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }
}

impl AnswerExtractor for QaEngine {
    fn extract(&self, context: &str, question: &str, max_answer_len: usize) -> AnswerResult {
        match &self.state {
            EngineState::Unavailable(reason) => {
                AnswerResult::failure(format!("Model not loaded: {reason}"))
            }
            EngineState::Ready(predictor) => predictor
                .predict(context, question, max_answer_len)
                .unwrap_or_else(|e| {
                    tracing::warn!("extraction failed: {e:#}");
                    AnswerResult::failure(format!("Error processing question: {e}"))
                }),
        }
    }
}

/// The loaded assets plus the per-call pipeline.
struct SpanPredictor {
    model:       SpanQaModel<InferBackend>,
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    device:      InferDevice,
}

impl SpanPredictor {
    fn load(store: &ModelStore) -> Result<Self> {
        let config = store.load_config()?;
        // The input frame alone takes three special tokens.
        anyhow::ensure!(
            config.max_seq_len >= 3,
            "model max_seq_len {} cannot hold [CLS] q [SEP] c [SEP]",
            config.max_seq_len
        );
        let tokenizer = store.load_tokenizer()?;
        let device = InferDevice::default();
        let model = store.load_model::<InferBackend>(&config, &device)?;
        Ok(Self {
            model,
            tokenizer,
            max_seq_len: config.max_seq_len,
            device,
        })
    }

    /// One blocking request/response pass. No validation of the
    /// inputs here — empty strings just produce a low-quality
    /// result, and rejecting them is the presentation layer's
    /// job.
    fn predict(
        &self,
        context:        &str,
        question:       &str,
        max_answer_len: usize,
    ) -> Result<AnswerResult> {
        let cls_id = self.special_id("[CLS]")?;
        let sep_id = self.special_id("[SEP]")?;

        let q_ids = self.encode(question)?;
        let c_ids = self.encode(context)?;

        // Question first, context second, the way the upstream
        // model was trained. Three special tokens frame them.
        let budget = self.max_seq_len.saturating_sub(3);
        let (q_keep, c_keep) = fit_longest_first(q_ids.len(), c_ids.len(), budget);

        let mut input_ids: Vec<u32> = Vec::with_capacity(q_keep + c_keep + 3);
        input_ids.push(cls_id);
        input_ids.extend_from_slice(&q_ids[..q_keep]);
        input_ids.push(sep_id);
        input_ids.extend_from_slice(&c_ids[..c_keep]);
        input_ids.push(sep_id);
        let seq_len = input_ids.len();

        // Forward pass — a batch of one, so no padding.
        let flat: Vec<i32> = input_ids.iter().map(|&x| x as i32).collect();
        let input = Tensor::<InferBackend, 1, Int>::from_ints(
            TensorData::new(flat, [seq_len]),
            &self.device,
        )
        .unsqueeze::<2>();
        let scores = self.model.forward(input);

        let start_probs = to_probs(scores.start)?;
        let end_probs = to_probs(scores.end)?;

        let (start, end) = clamp_span(
            argmax(&start_probs),
            argmax(&end_probs),
            max_answer_len,
        );

        let decoded = self
            .tokenizer
            .decode(&input_ids[start..=end], true)
            .map_err(|e| anyhow::anyhow!("decode: {e}"))?;
        let decoded = decoded.trim();

        // Confidence uses the clamped positions, matching the
        // span actually returned.
        let confidence = (start_probs[start] + end_probs[end]) / 2.0;

        tracing::debug!(
            "span [{start},{end}] of seq_len={seq_len}, confidence={confidence:.4}"
        );

        let answer = if decoded.is_empty() { NO_ANSWER_MESSAGE } else { decoded };
        Ok(AnswerResult::span(answer, confidence, start, end))
    }

    fn special_id(&self, token: &str) -> Result<u32> {
        self.tokenizer
            .token_to_id(token)
            .ok_or_else(|| anyhow::anyhow!("tokenizer has no {token} token"))
    }

    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("tokenise: {e}"))?;
        Ok(encoding.get_ids().to_vec())
    }
}

/// Softmax a [1, seq_len] logit tensor and read it back as a
/// plain vector.
fn to_probs(logits: Tensor<InferBackend, 2>) -> Result<Vec<f32>> {
    burn::tensor::activation::softmax(logits, 1)
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow::anyhow!("tensor readback: {e:?}"))
}

/// Index of the largest score. Ties keep the earliest position.
fn argmax(scores: &[f32]) -> usize {
    scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// The two corrective policies, in order: an end before the
/// start collapses the span to the single start token, and a
/// span longer than `max_answer_len` tokens is cut at
/// `start + max_answer_len`.
fn clamp_span(start: usize, end: usize, max_answer_len: usize) -> (usize, usize) {
    let end = if end < start { start } else { end };
    let end = if end - start > max_answer_len {
        start + max_answer_len
    } else {
        end
    };
    (start, end)
}

/// Trim (question_len, context_len) down to `budget` total
/// tokens by shaving the longer side first; ties shave the
/// context, so the question survives intact longest.
fn fit_longest_first(q_len: usize, c_len: usize, budget: usize) -> (usize, usize) {
    let (mut q, mut c) = (q_len, c_len);
    while q + c > budget {
        if q > c {
            q -= 1;
        } else {
            c -= 1;
        }
    }
    (q, c)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::model_store::testkit;

    #[test]
    fn clamp_collapses_inverted_spans() {
        assert_eq!(clamp_span(10, 4, 100), (10, 10));
        assert_eq!(clamp_span(10, 10, 100), (10, 10));
    }

    #[test]
    fn clamp_truncates_overlong_spans() {
        assert_eq!(clamp_span(5, 200, 100), (5, 105));
        // Exactly at the bound is left alone
        assert_eq!(clamp_span(5, 105, 100), (5, 105));
    }

    #[test]
    fn clamp_passes_valid_spans_through() {
        assert_eq!(clamp_span(3, 7, 100), (3, 7));
    }

    #[test]
    fn argmax_prefers_earliest_on_ties() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
        assert_eq!(argmax(&[0.5]), 0);
    }

    #[test]
    fn fitting_leaves_small_inputs_alone() {
        assert_eq!(fit_longest_first(10, 20, 100), (10, 20));
    }

    #[test]
    fn fitting_shaves_the_longer_side_first() {
        // Context is longer — it pays the whole cost
        assert_eq!(fit_longest_first(10, 90, 60), (10, 50));
        // Question is longer
        assert_eq!(fit_longest_first(90, 10, 60), (50, 10));
        // Both oversized — they meet in the middle
        let (q, c) = fit_longest_first(500, 500, 100);
        assert_eq!(q + c, 100);
        assert_eq!(q, 50);
    }

    #[test]
    fn fitting_handles_empty_sides() {
        assert_eq!(fit_longest_first(0, 600, 509), (0, 509));
        assert_eq!(fit_longest_first(600, 0, 509), (509, 0));
    }

    #[test]
    fn unavailable_engine_errors_on_every_input() {
        let engine = QaEngine {
            state: EngineState::Unavailable("weights missing".into()),
        };
        for (context, question) in [
            ("Paris is the capital of France.", "What is the capital?"),
            ("", "anything"),
            ("", ""),
        ] {
            let r = engine.extract(context, question, DEFAULT_MAX_ANSWER_LEN);
            assert!(r.error);
            assert_eq!(r.confidence, 0.0);
            assert!(r.answer.contains("weights missing"));
        }
    }

    #[test]
    fn loading_from_a_missing_directory_yields_unavailable() {
        let store = ModelStore::new("no/such/model/dir");
        let engine = QaEngine::load(&store);
        assert!(!engine.is_ready());
        let r = engine.extract("some context", "some question", DEFAULT_MAX_ANSWER_LEN);
        assert!(r.error);
        assert_eq!(r.confidence, 0.0);
    }

    // End-to-end over randomly initialised tiny weights: the
    // answers are nonsense, but every structural guarantee must
    // hold regardless of what the weights say.
    #[test]
    fn extraction_invariants_hold_for_arbitrary_weights() {
        let dir = tempfile::tempdir().unwrap();
        testkit::write_assets(dir.path()).unwrap();
        let engine = QaEngine::load(&ModelStore::new(dir.path()));
        assert!(engine.is_ready());

        let cases = [
            ("Paris is the capital of France.", "What is the capital of France?"),
            ("Berlin is the capital of Germany.", "capital?"),
            ("", "What is the capital of France?"),
            ("Paris is the capital of France.", ""),
        ];
        for (context, question) in cases {
            let r = engine.extract(context, question, 5);
            assert!(!r.error, "unexpected error for {question:?}: {}", r.answer);
            assert!((0.0..=1.0).contains(&r.confidence), "confidence {}", r.confidence);
            let (s, e) = (r.start_position.unwrap(), r.end_position.unwrap());
            assert!(e >= s);
            assert!(e - s <= 5);
            assert!(!r.answer.is_empty());
        }
    }

    #[test]
    fn empty_decode_falls_back_to_the_no_answer_message() {
        let dir = tempfile::tempdir().unwrap();
        testkit::write_assets(dir.path()).unwrap();
        let engine = QaEngine::load(&ModelStore::new(dir.path()));

        // With no question and no context the sequence is pure
        // special tokens, so the decoded span is always empty.
        let r = engine.extract("", "", DEFAULT_MAX_ANSWER_LEN);
        assert!(!r.error);
        assert_eq!(r.answer, NO_ANSWER_MESSAGE);
        // The numeric confidence is still reported
        assert!((0.0..=1.0).contains(&r.confidence));
    }

    #[test]
    fn long_context_is_truncated_not_rejected() {
        let dir = tempfile::tempdir().unwrap();
        testkit::write_assets(dir.path()).unwrap();
        let engine = QaEngine::load(&ModelStore::new(dir.path()));

        // Way past the tiny model's 64-token window
        let context = "paris is the capital of france . ".repeat(50);
        let r = engine.extract(&context, "what is the capital of france ?", 10);
        assert!(!r.error, "{}", r.answer);
        // The span must fit inside the model window
        assert!(r.end_position.unwrap() < testkit::tiny_config().max_seq_len);
    }

    // Runs only when a real pretrained model directory is
    // available locally; weights are not vendored with the
    // repo. Set PASSAGE_QA_MODEL_DIR to enable.
    #[test]
    fn pretrained_model_answers_capital_of_france() {
        let Ok(dir) = std::env::var("PASSAGE_QA_MODEL_DIR") else {
            return;
        };
        let engine = QaEngine::load(&ModelStore::new(dir));
        assert!(engine.is_ready());

        let r = engine.extract(
            "Paris is the capital of France.",
            "What is the capital of France?",
            DEFAULT_MAX_ANSWER_LEN,
        );
        assert!(!r.error);
        assert!(r.answer.to_lowercase().contains("paris"), "got '{}'", r.answer);
        assert!(r.confidence > 0.4, "confidence {}", r.confidence);
    }
}
