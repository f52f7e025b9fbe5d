// ============================================================
// Layer 1 — Interactive Chat Loop
// ============================================================
// A readline REPL over one ChatSession. Plain input is treated
// as a question; lines starting with ':' are session commands
// covering what the original page chrome did — editing the
// context, clearing the history, and showing session stats.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::application::session::ChatSession;
use crate::cli::render;
use crate::ml::extractor::QaEngine;

enum Flow {
    Continue,
    Quit,
}

pub fn run(mut session: ChatSession<QaEngine>, model_ready: bool) -> anyhow::Result<()> {
    println!("{}", "passage-qa chat — :help for commands, :quit to leave".bold());
    if !model_ready {
        println!(
            "{}",
            "warning: the model failed to load; every answer will be an error".yellow()
        );
    }
    if session.has_context() {
        println!("Context loaded. Ask away.");
    } else {
        println!("Set a passage first with :context <text> or :load <file>.");
    }
    println!();

    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();

                if let Some(cmd) = line.strip_prefix(':') {
                    match handle_command(cmd, &mut session) {
                        Flow::Continue => {}
                        Flow::Quit => break,
                    }
                } else {
                    match session.ask(line) {
                        Ok(exchange) => render::print_exchange(&exchange),
                        Err(rejection) => println!("{}", rejection.message().yellow()),
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("(use :quit to leave)");
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}", format!("input error: {e}").red());
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn handle_command(cmd: &str, session: &mut ChatSession<QaEngine>) -> Flow {
    let (name, rest) = match cmd.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (cmd, ""),
    };

    match name {
        "help" | "h" => print_help(),
        "quit" | "exit" | "q" => return Flow::Quit,
        "context" => {
            if rest.is_empty() {
                show_context(session);
            } else {
                session.set_context(rest);
                println!("Context set ({} chars).", session.context().len());
            }
        }
        "load" => {
            if rest.is_empty() {
                println!("usage: :load <file>");
            } else {
                match std::fs::read_to_string(rest) {
                    Ok(text) => {
                        println!("Context loaded from '{rest}' ({} chars).", text.len());
                        session.set_context(text);
                    }
                    Err(e) => println!("{}", format!("cannot read '{rest}': {e}").red()),
                }
            }
        }
        "clear" => {
            session.clear_history();
            println!("Chat history cleared.");
        }
        "stats" => render::print_stats(&session.stats()),
        other => println!("Unknown command ':{other}'. Type :help for the list."),
    }
    Flow::Continue
}

fn show_context(session: &ChatSession<QaEngine>) {
    if !session.has_context() {
        println!("No context set. Use :context <text> or :load <file>.");
        return;
    }
    // Preview only — pasted passages can be long
    let context = session.context();
    let preview: String = context.chars().take(120).collect();
    if context.chars().count() > 120 {
        println!("{preview}…");
    } else {
        println!("{preview}");
    }
}

fn print_help() {
    println!("Type a question to ask it against the current context.");
    println!("  :context <text>   set the context passage inline");
    println!("  :context          show the current passage");
    println!("  :load <file>      read the context passage from a file");
    println!("  :clear            clear the chat history");
    println!("  :stats            questions asked and average confidence");
    println!("  :quit             leave the chat");
}
