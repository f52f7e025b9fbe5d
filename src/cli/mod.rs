// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Argument parsing is
// done with the `clap` crate; all business logic is delegated
// to Layer 2 (application).
//
// Two commands are supported:
//   1. `ask`  — answer a single question and exit
//   2. `chat` — interactive conversation over one passage
//
// This layer also owns the non-empty checks on context and
// question for `ask` — the extraction service itself accepts
// anything and validates nothing.

pub mod commands;
pub mod render;
pub mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, path::Path};

use crate::application::answer_use_case::{AnswerConfig, AnswerUseCase};
use commands::{AskArgs, ChatArgs, Commands};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "passage-qa",
    version,
    about = "Ask questions about a pasted passage — answers are literal spans \
             picked out by a pretrained extractive QA model."
)]
pub struct Cli {
    /// The subcommand to run (ask or chat)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch. This keeps the CLI
    /// layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Ask(args)  => run_ask(args),
            Commands::Chat(args) => run_chat(args),
        }
    }
}

fn run_ask(args: AskArgs) -> Result<()> {
    let context = match (&args.context, &args.context_file) {
        (Some(text), _)    => text.clone(),
        (None, Some(path)) => read_context(path)?,
        (None, None)       => anyhow::bail!("provide the passage via --context or --context-file"),
    };
    if context.trim().is_empty() {
        anyhow::bail!("the context passage is empty — there is nothing to answer from");
    }
    if args.question.trim().is_empty() {
        anyhow::bail!("the question is empty");
    }

    let use_case = AnswerUseCase::new(AnswerConfig::from(&args));
    let result = use_case.answer(&context, args.question.trim());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_answer(&result);
    }
    Ok(())
}

fn run_chat(args: ChatArgs) -> Result<()> {
    let use_case = AnswerUseCase::new(AnswerConfig::from(&args));
    let model_ready = use_case.is_ready();

    let mut session = use_case.into_session();
    if let Some(path) = &args.context_file {
        session.set_context(read_context(path)?);
    }

    repl::run(session, model_ready)
}

fn read_context(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("cannot read context file '{}'", path.display()))
}
