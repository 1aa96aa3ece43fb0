use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Left-align `name` and right-align `value` inside `width` columns,
/// truncating the name when the row would not fit. Widths are counted in
/// chars, which is what the list widgets measure for plain names.
pub(crate) fn score_row(name: &str, value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let value_len = value.chars().count();
    if value_len + 1 >= width {
        return name.chars().take(width).collect();
    }

    let name_room = width - value_len - 1;
    let mut shown: String = name.chars().take(name_room).collect();
    let name_len = shown.chars().count();
    if name_len < name.chars().count() && name_room > 1 {
        shown = name.chars().take(name_room - 1).collect();
        shown.push('~');
    }

    let padding = width - value_len - shown.chars().count();
    let mut row = String::with_capacity(width);
    row.push_str(&shown);
    row.push_str(&" ".repeat(padding));
    row.push_str(value);
    row
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
