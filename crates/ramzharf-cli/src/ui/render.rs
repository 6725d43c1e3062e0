//! Rendering primitives for CLI output.

use chrono::{DateTime, Utc};
use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;

use ramzharf_core::storage::Note;

use super::UiContext;

/// Status badge types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Ok,
    Warn,
}

/// Prefix `message` with a status badge, colored when the terminal allows.
pub fn badge(ctx: &UiContext, kind: Badge, message: &str) -> String {
    let text = match kind {
        Badge::Ok => "[OK]",
        Badge::Warn => "[WARN]",
    };
    if !ctx.color {
        return format!("{} {}", text, message);
    }
    match kind {
        Badge::Ok => format!("{} {}", text.green().bold(), message),
        Badge::Warn => format!("{} {}", text.yellow().bold(), message),
    }
}

fn format_expiry(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match expires_at {
        None => "never".to_string(),
        Some(at) if at <= now => "expired".to_string(),
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}

/// Notes as a borderless table (TTY) or one space-separated line per note.
pub fn notes_table(ctx: &UiContext, notes: &[Note], now: DateTime<Utc>) -> String {
    let rows: Vec<[String; 3]> = notes
        .iter()
        .map(|note| {
            [
                note.id.to_string(),
                note.created_at.format("%Y-%m-%d %H:%M").to_string(),
                format_expiry(note.expires_at, now),
            ]
        })
        .collect();

    if !ctx.is_tty {
        return rows
            .iter()
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = ["ID", "CREATED", "EXPIRES"]
        .iter()
        .map(|h| {
            let mut cell = Cell::new(h);
            if ctx.color {
                cell = cell.add_attribute(Attribute::Dim);
            }
            cell
        })
        .collect();
    table.set_header(header_cells);

    for i in 0..3 {
        if let Some(column) = table.column_mut(i) {
            column.set_padding((0, 2));
        }
    }
    for row in rows {
        table.add_row(row.to_vec());
    }
    table.to_string()
}
