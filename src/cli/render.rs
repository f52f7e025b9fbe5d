// ============================================================
// Layer 1 — Terminal Rendering
// ============================================================
// Turns domain values into coloured terminal output. The colour
// scheme mirrors the confidence buckets: green for High, yellow
// for Medium, red for Low — and red for errors.
//
// All functions here are print-only; nothing in this module
// mutates state or touches the model.

use colored::{Color, Colorize};

use crate::application::session::SessionStats;
use crate::domain::answer::AnswerResult;
use crate::domain::confidence::ConfidenceLevel;
use crate::domain::exchange::Exchange;

fn level_color(level: ConfidenceLevel) -> Color {
    match level {
        ConfidenceLevel::High   => Color::Green,
        ConfidenceLevel::Medium => Color::Yellow,
        ConfidenceLevel::Low    => Color::Red,
    }
}

/// "High confidence (87.3%)", coloured by bucket.
pub fn confidence_line(result: &AnswerResult) -> String {
    let level = result.confidence_level();
    format!(
        "{} confidence ({:.1}%)",
        level.label(),
        result.confidence * 100.0
    )
    .color(level_color(level))
    .to_string()
}

/// One-shot `ask` output: answer plus its confidence line, or
/// the failure description in red.
pub fn print_answer(result: &AnswerResult) {
    if result.error {
        println!("{}", result.answer.red());
        return;
    }
    println!("\nAnswer: {}", result.answer);
    println!("{}", confidence_line(result));
}

/// One chat round: timestamp, question, answer, confidence.
pub fn print_exchange(exchange: &Exchange) {
    println!("{}", exchange.timestamp().dimmed());
    println!("{} {}", "you:".bold(), exchange.question);
    if exchange.result.error {
        println!("{} {}", "bot:".bold(), exchange.result.answer.red());
    } else {
        println!("{} {}", "bot:".bold(), exchange.result.answer);
        println!("     {}", confidence_line(&exchange.result));
    }
    println!();
}

pub fn print_stats(stats: &SessionStats) {
    println!("Questions asked:  {}", stats.questions);
    println!("Avg. confidence:  {:.1}%", stats.mean_confidence * 100.0);
}
