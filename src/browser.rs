//! # Interactive catalog browser
//!
//! The read-eval-render loop behind `mb browse`. Each line of input is parsed
//! into one [`Command`], applied to the session's [`Explorer`], and followed
//! by a redraw whenever the transition reports a changed view. Rejected
//! transitions surface their message and leave the view exactly as it was.
//!
//! Commands:
//!
//! ```text
//! n | next              show the next page (wraps around)
//! p | prev              show the previous page (wraps around)
//! g | goto <page>       jump to a page number
//! s | search <text>     filter titles by a case-insensitive substring
//! r | recommend [k] [kind]   replace the view with the k most similar movies
//! reset                 back to the full catalog
//! h | help | ?          show this list
//! q | quit | exit       leave the browser
//! ```

use crossterm::{
    ExecutableCommand,
    style::{Color, Print, SetForegroundColor},
};
use std::{
    error::Error,
    io::{Write, stdout},
};
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::MovieBuddyConfig;
use crate::explorer::{Explorer, Render};
use crate::render;

/// One parsed line of browser input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Next,
    Prev,
    Goto(usize),
    Search(String),
    Recommend { k: Option<usize>, kind: Option<String> },
    Reset,
    Help,
    Quit,
}

/// Parse one input line. Returns `None` for an empty or unrecognized line.
fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;

    match head {
        "n" | "next" => Some(Command::Next),
        "p" | "prev" => Some(Command::Prev),
        "g" | "goto" => parts.next()?.parse().ok().map(Command::Goto),
        "s" | "search" => {
            let text = parts.collect::<Vec<_>>().join(" ");
            Some(Command::Search(text))
        }
        "r" | "recommend" => {
            let k = match parts.next() {
                Some(raw) => Some(raw.parse().ok()?),
                None => None,
            };
            let kind = parts.next().map(str::to_string);
            Some(Command::Recommend { k, kind })
        }
        "reset" => Some(Command::Reset),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

/// Run the interactive browser until the user quits or stdin closes.
///
/// # Parameters
/// - `catalog`: The loaded corpus; shared immutably with the session.
/// - `config`: Application configuration (recommendation bounds).
/// - `kind`: Embedding kind used when a recommend command doesn't name one.
pub fn browse(
    catalog: &Catalog,
    config: &MovieBuddyConfig,
    kind: &str,
) -> Result<(), Box<dyn Error>> {
    let mut explorer = Explorer::new(catalog);

    println!(
        "Browsing {} movies. Type 'h' for help, 'q' to quit.",
        catalog.len()
    );
    redraw(&explorer)?;

    loop {
        let mut out = stdout();
        out.execute(SetForegroundColor(Color::Green))?;
        out.execute(Print("\nmb> "))?;
        out.execute(SetForegroundColor(Color::Reset))?;
        out.flush()?;

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        if input.trim().is_empty() {
            continue;
        }

        let Some(command) = parse_command(&input) else {
            render::print_error("Unrecognized command, type 'h' for help");
            continue;
        };
        debug!("Dispatching {command:?}");

        let outcome = match command {
            Command::Quit => break,
            Command::Help => {
                print_help();
                continue;
            }
            Command::Next => Ok(explorer.next()),
            Command::Prev => Ok(explorer.prev()),
            Command::Goto(page) => explorer.goto(page),
            Command::Search(text) => explorer.search(&text).inspect(|_| {
                if !explorer.applied_filter().is_empty() {
                    render::print_info(&format!(
                        "Current filter: [{}], 'reset' to clear",
                        explorer.applied_filter()
                    ));
                }
            }),
            Command::Recommend { k, kind: requested } => {
                let k = k.unwrap_or(1);
                if k == 0 || k > config.max_recommendations {
                    render::print_error(&format!(
                        "Number of recommendations should be between 1 and {}",
                        config.max_recommendations
                    ));
                    continue;
                }
                explorer.recommend(k, requested.as_deref().unwrap_or(kind))
            }
            Command::Reset => Ok(explorer.reset()),
        };

        match outcome {
            Ok(Render::Refresh) => redraw(&explorer)?,
            Ok(Render::Unchanged) => {}
            Err(err) => render::print_error(&err.to_string()),
        }
    }

    Ok(())
}

/// Redraw the record the explorer currently points at.
fn redraw(explorer: &Explorer) -> Result<(), Box<dyn Error>> {
    match explorer.current_record() {
        Some(record) => render::print_record(
            record,
            explorer.current_page_number(),
            explorer.page_count(),
            explorer.current_score(),
            explorer.applied_filter(),
        ),
        None => {
            render::print_info("The catalog is empty");
            Ok(())
        }
    }
}

fn print_help() {
    println!("n | next                   show the next page (wraps around)");
    println!("p | prev                   show the previous page (wraps around)");
    println!("g | goto <page>            jump to a page number");
    println!("s | search <text>          filter titles by a case-insensitive substring");
    println!("r | recommend [k] [kind]   replace the view with the k most similar movies");
    println!("reset                      back to the full catalog");
    println!("q | quit                   leave the browser");
}
