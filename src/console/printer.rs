//! Boxed, role-colored rendering of outgoing chat messages.

use crossterm::style::{Color, Stylize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::models::{Role, Turn};

pub const SENDING_HEADER: &str = "========= Sending Messages =========";

/// Widest content line before wrapping.
const MAX_BOX_WIDTH: usize = 96;

/// Purple.
const FUNCTION_COLOR: Color = Color::Magenta;

#[must_use]
pub fn color_for(turn: &Turn) -> Color {
    match (turn.role, &turn.function_call) {
        (Role::System, _) => Color::Yellow,
        (Role::Human, _) => Color::Green,
        (Role::Ai, Some(_)) => Color::Cyan,
        (Role::Ai, None) => Color::Blue,
        (Role::Function, _) => FUNCTION_COLOR,
    }
}

/// Text shown inside the box. Tool-call requests show the call, never the
/// message content.
#[must_use]
pub fn display_text(turn: &Turn) -> String {
    match (turn.role, &turn.function_call) {
        (Role::Ai, Some(call)) => {
            format!("Running tool {} with args {}", call.name, call.arguments)
        }
        _ => turn.content.clone(),
    }
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for ch in line.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > width && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }

    rows.push(current);
    rows
}

fn boxed(title: &str, body: &str, color: Color) -> String {
    let rows: Vec<String> = body
        .lines()
        .flat_map(|line| wrap_line(line, MAX_BOX_WIDTH))
        .collect();
    let rows = if rows.is_empty() { vec![String::new()] } else { rows };

    let title_width = title.width();
    let inner = rows
        .iter()
        .map(|row| row.width())
        .max()
        .unwrap_or(0)
        .max(title_width + 1);

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(format!(
        "╭─ {} {}╮",
        title,
        "─".repeat(inner + 2 - (title_width + 3))
    ));
    for row in &rows {
        out.push(format!("│ {}{} │", row, " ".repeat(inner - row.width())));
    }
    out.push(format!("╰{}╯", "─".repeat(inner + 2)));

    out.into_iter()
        .map(|line| line.with(color).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one message as a colored box titled with its role.
#[must_use]
pub fn render_turn(turn: &Turn) -> String {
    boxed(turn.role.as_str(), &display_text(turn), color_for(turn))
}

#[must_use]
pub fn render_messages(turns: &[Turn]) -> String {
    let mut out = format!("\n\n {SENDING_HEADER} \n\n");
    for turn in turns {
        out.push_str(&render_turn(turn));
        out.push('\n');
    }
    out
}
