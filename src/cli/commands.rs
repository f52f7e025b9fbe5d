// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `ask` and `chat`, and all their
// flags. clap's derive macros generate the help text, the error
// messages for missing args, and the type conversions.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::answer_use_case::AnswerConfig;
use crate::ml::extractor::DEFAULT_MAX_ANSWER_LEN;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer one question about a passage and exit
    Ask(AskArgs),

    /// Start an interactive chat over a passage
    Chat(ChatArgs),
}

/// All arguments for the `ask` command.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The question to answer
    #[arg(long)]
    pub question: String,

    /// The context passage, inline on the command line
    #[arg(long, conflicts_with = "context_file")]
    pub context: Option<String>,

    /// Read the context passage from a text file instead
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// Directory holding model_config.json, model.mpk and
    /// tokenizer.json — point elsewhere to swap the model
    #[arg(long, default_value = "models/squad")]
    pub model_dir: String,

    /// Upper bound on the answer span, in tokens
    #[arg(long, default_value_t = DEFAULT_MAX_ANSWER_LEN)]
    pub max_answer_len: usize,

    /// Print the raw result as JSON (answer, confidence,
    /// start_position, end_position, error)
    #[arg(long)]
    pub json: bool,
}

/// All arguments for the `chat` command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Preload the context passage from a text file
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// Directory holding the pretrained model assets
    #[arg(long, default_value = "models/squad")]
    pub model_dir: String,

    /// Upper bound on the answer span, in tokens
    #[arg(long, default_value_t = DEFAULT_MAX_ANSWER_LEN)]
    pub max_answer_len: usize,
}

// Convert CLI args into the application-layer config — the
// boundary between Layer 1 and Layer 2. The application layer
// never sees clap types.
impl From<&AskArgs> for AnswerConfig {
    fn from(a: &AskArgs) -> Self {
        AnswerConfig {
            model_dir:      a.model_dir.clone(),
            max_answer_len: a.max_answer_len,
        }
    }
}

impl From<&ChatArgs> for AnswerConfig {
    fn from(a: &ChatArgs) -> Self {
        AnswerConfig {
            model_dir:      a.model_dir.clone(),
            max_answer_len: a.max_answer_len,
        }
    }
}
