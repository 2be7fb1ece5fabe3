//! # Terminal rendering for catalog records
//!
//! Formats the currently displayed movie (title, page position, similarity
//! score, source URL, plot body) and one-shot recommendation lists for the
//! terminal. Headlines and prompts use Crossterm attributes directly; the
//! plot body goes through a Termimad skin so long paragraphs wrap cleanly at
//! the terminal width; informational and error surfaces use Console styling.
//!
//! Rendering is the only place scores are rounded: the raw `f32` stays in the
//! explorer, the banner shows 12 fractional digits.

use crossterm::{
    ExecutableCommand,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
};
use std::{
    error::Error,
    io::{Write, stdout},
};
use termimad::MadSkin;

use crate::catalog::MovieRecord;

/// Format the similarity banner shown in the Recommending state.
pub fn format_score_banner(score: f32) -> String {
    format!("Movie similarity score: {score:.12} [min: 0, max: 1.0]")
}

/// Format the page footer, including the active filter when one is applied.
pub fn format_page_footer(page_number: usize, page_count: usize, filter: &str) -> String {
    if filter.is_empty() {
        format!("Page {page_number} of {page_count}")
    } else {
        format!("Page {page_number} of {page_count} [filter: {filter}]")
    }
}

/// Print the currently displayed record.
///
/// # Parameters
/// - `record`: The record to display.
/// - `page_number` / `page_count`: 1-based position within the active view.
/// - `score`: Similarity score of this record, present only in the
///   Recommending state.
/// - `filter`: The active title filter, empty when none.
pub fn print_record(
    record: &MovieRecord,
    page_number: usize,
    page_count: usize,
    score: Option<f32>,
    filter: &str,
) -> Result<(), Box<dyn Error>> {
    let mut out = stdout();

    out.execute(Print("\n"))?;
    out.execute(SetForegroundColor(Color::Cyan))?;
    out.execute(SetAttribute(Attribute::Bold))?;
    out.execute(Print(&record.title))?;
    out.execute(SetAttribute(Attribute::Reset))?;
    out.execute(SetForegroundColor(Color::Reset))?;
    out.execute(Print("\n"))?;

    if let Some(score) = score {
        out.execute(SetForegroundColor(Color::Blue))?;
        out.execute(Print(format_score_banner(score)))?;
        out.execute(SetForegroundColor(Color::Reset))?;
        out.execute(Print("\n"))?;
    }

    println!("{}", console::style(&record.url).dim().underlined());
    out.flush()?;

    let skin = MadSkin::default();
    skin.print_text(&record.plot);

    println!(
        "{}",
        console::style(format_page_footer(page_number, page_count, filter)).dim()
    );

    Ok(())
}

/// Print a ranked recommendation list, one line per record.
///
/// The first entry is the query movie itself (self-similarity 1.0), matching
/// what the interactive recommendation view shows.
pub fn print_neighbors(records: &[MovieRecord], scores: &[f32]) -> Result<(), Box<dyn Error>> {
    for (i, (record, score)) in records.iter().zip(scores).enumerate() {
        println!(
            "{:>3}. {} (score: {score:.4})",
            i + 1,
            console::style(&record.title).bold()
        );
        println!("     {}", console::style(&record.url).dim());
    }
    Ok(())
}

/// Print a user-visible error message.
pub fn print_error(message: &str) {
    eprintln!("{}", console::style(format!("⛔ {message}")).red());
}

/// Print an informational message.
pub fn print_info(message: &str) {
    println!("{}", console::style(format!("ℹ️ {message}")).blue());
}
