// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define the core concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or terminal code
//   - Only plain structs, enums, and traits
//
// Why keep this layer pure?
//   - Easy to unit test (no model weights needed)
//   - Easy to understand (no framework noise)
//   - Easy to swap implementations (just implement the trait)

// The result of one extraction call
pub mod answer;

// Three-bucket classification of a confidence score
pub mod confidence;

// One question/answer entry of the chat history
pub mod exchange;

// Core abstractions (traits) that other layers implement
pub mod traits;
