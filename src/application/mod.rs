// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish a goal: answering
// one question, or running a whole chat session.
//
// Rules for this layer:
//   - No tensor math or model code here
//   - No printing or terminal code here (that's Layer 1)
//   - Only workflow coordination and session bookkeeping

// One-shot question answering
pub mod answer_use_case;

// Context + history bookkeeping for an interactive session
pub mod session;
