//! Terminal output for plan views.
//!
//! Rich mode colours what the display types emit: headings in blue, the
//! `+`/`-` lines of a ```` ```diff ```` fence in green/red, and everything
//! else through a termimad skin. Plain mode prints the text unchanged.

use anyhow::Result;
use plandeck_core::display::OperationStatus;
use termimad::{crossterm::style::Color, MadSkin};

const RESET: &str = "\x1b[0m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";

/// How one output line is drawn in rich mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStyle {
    Heading,
    Fence,
    Added,
    Removed,
    Unchanged,
    Prose,
}

impl LineStyle {
    fn color(self) -> Option<&'static str> {
        match self {
            LineStyle::Heading => Some(BLUE),
            LineStyle::Fence | LineStyle::Unchanged => Some(DIM),
            LineStyle::Added => Some(GREEN),
            LineStyle::Removed => Some(RED),
            LineStyle::Prose => None,
        }
    }
}

/// Classify each line, tracking whether it sits inside a diff fence.
fn classify(markdown: &str) -> Vec<(LineStyle, &str)> {
    let mut in_diff = false;
    markdown
        .lines()
        .map(|line| {
            let style = if line.starts_with("```") {
                in_diff = !in_diff && line.trim_end() == "```diff";
                LineStyle::Fence
            } else if in_diff {
                match line.chars().next() {
                    Some('+') => LineStyle::Added,
                    Some('-') => LineStyle::Removed,
                    _ => LineStyle::Unchanged,
                }
            } else if line.starts_with('#') {
                LineStyle::Heading
            } else {
                LineStyle::Prose
            };
            (style, line)
        })
        .collect()
}

/// Switches between coloured and plain output.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Print a plan view to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }
        for (style, line) in classify(markdown) {
            match style.color() {
                Some(color) => println!("{color}{line}{RESET}"),
                None => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }

    /// Print an outcome to stderr; failures in red with the hint in yellow.
    pub fn render_status(&self, status: &OperationStatus) {
        if !self.rich_enabled {
            eprint!("{status}");
            return;
        }
        let color = if status.success { GREEN } else { RED };
        let verdict = if status.success { "Success:" } else { "Error:" };
        eprintln!("{color}{verdict} {}{RESET}", status.message);
        if let Some(hint) = &status.hint {
            eprintln!("{YELLOW}Hint: {hint}{RESET}");
        }
    }
}
