// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without tensors
//   - The network architecture is clearly separated from
//     the extraction policy built on top of it
//
// What's in this layer:
//
//   model.rs     — The transformer encoder with a span head.
//                  Inference only: no autodiff, no loss. The
//                  weights come pretrained from a model
//                  directory, they are never produced here.
//
//   extractor.rs — The answer extraction service. Encodes a
//                  (question, context) pair, runs one forward
//                  pass, picks and clamps the answer span,
//                  decodes it, and derives the confidence.
//
// Reference: Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Transformer encoder span-prediction architecture
pub mod model;

/// Answer extraction service built on the span model
pub mod extractor;
