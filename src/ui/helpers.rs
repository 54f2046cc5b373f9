use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Student;

/// Center `label` within `width` columns, truncating when it does not fit.
pub(crate) fn centered_label(label: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut text: String = label.trim().chars().take(width).collect();
    let len = text.chars().count();
    let left = (width - len) / 2;
    let right = width - len - left;
    text.insert_str(0, &" ".repeat(left));
    text.push_str(&" ".repeat(right));
    text
}

/// Text lines for one roster card: name, student number, department.
pub(crate) fn student_card_lines(
    student: &Student,
    inner_width: u16,
    inner_height: u16,
    selected: bool,
) -> Vec<Line<'static>> {
    let width = inner_width as usize;
    let height = inner_height as usize;
    if width == 0 || height == 0 {
        return vec![Line::from("")];
    }

    let name_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let detail_style = if selected {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut lines = vec![Line::from(Span::styled(
        centered_label(&student.name, width),
        name_style,
    ))];
    if height >= 2 {
        lines.push(Line::from(Span::styled(
            centered_label(&student.npm, width),
            detail_style,
        )));
    }
    if height >= 3 {
        lines.push(Line::from(Span::styled(
            centered_label(&student.department, width),
            detail_style,
        )));
    }
    lines
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

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn label_is_centered_and_truncated() {
        assert_eq!(centered_label("ab", 6), "  ab  ");
        assert_eq!(centered_label("abcdef", 4), "abcd");
        assert_eq!(centered_label("x", 0), "");
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = Err::<(), _>(anyhow!("NPM sudah terdaftar"))
            .context("failed to save")
            .unwrap_err();
        assert_eq!(surface_error(&err), "NPM sudah terdaftar");
    }
}
