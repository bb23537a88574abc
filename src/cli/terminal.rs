//! Status lines and table headers for the terminal.

use std::fmt::Display;

use owo_colors::{OwoColorize, colors::css};

/// Below this many columns listings fall back to one line per entity.
const NARROW_COLUMNS: u16 = 60;

/// How a line of output should be coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
    Muted,
}

impl Tone {
    /// Colour `text`, or leave it plain if stdout does not support colour.
    pub fn paint(self, text: &str) -> String {
        if supports_color::on(supports_color::Stream::Stdout).is_none() {
            return text.to_string();
        }
        match self {
            Self::Success => text.fg::<css::Green>().to_string(),
            Self::Failure => text.fg::<css::Red>().to_string(),
            Self::Muted => text.dimmed().to_string(),
        }
    }
}

/// A `✔`/`✘` line describing the outcome of a change.
pub fn outcome<E: Display>(result: &Result<(), E>, success: &str) -> String {
    match result {
        Ok(()) => Tone::Success.paint(&format!("✔ {success}")),
        Err(e) => Tone::Failure.paint(&format!("✘ {e}")),
    }
}

/// Whether stdout is a terminal too narrow for tabular listings.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(width, _)| width.0 < NARROW_COLUMNS)
}
