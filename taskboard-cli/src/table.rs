//! Terminal-aware board rendering.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use taskboard_sync::types::{BoardState, Card, Column, Priority};

/// Longest title shown in a board cell
const TITLE_WIDTH: usize = 40;

/// Create a table sized to the terminal, falling back to 120 columns when
/// not connected to a TTY.
pub fn new_table() -> Table {
    let width = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(120);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(width);
    table
}

/// Truncate a string to `max` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

/// One board cell: id, title and priority label
pub fn card_cell(card: &Card) -> String {
    format!(
        "#{} {}\n[{}]",
        card.id,
        truncate_str(&card.title, TITLE_WIDTH),
        Priority::label_for(card.priority)
    )
}

/// Lay the board out with one table column per board column
pub fn board_table(board: &BoardState) -> Table {
    let mut table = new_table();
    table.set_header(
        Column::ALL
            .iter()
            .map(|c| Cell::new(format!("{} ({})", c.title(), board.cards(*c).len()))),
    );

    let rows = Column::ALL
        .iter()
        .map(|c| board.cards(*c).len())
        .max()
        .unwrap_or(0);
    for row in 0..rows {
        table.add_row(Column::ALL.iter().map(|c| {
            board
                .cards(*c)
                .get(row)
                .map(card_cell)
                .unwrap_or_default()
        }));
    }
    table
}
