pub mod detail;
pub mod filters;
pub mod grid;
mod help;
pub mod picker;

use crate::app::{App, Overlay};
use crate::movie::UserRating;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
};
use unicode_width::UnicodeWidthStr;

/// Screen regions shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub filters: Rect,
    pub chips: Rect,
    pub count: Rect,
    pub grid: Rect,
    pub status: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    // header(3) + filter bar(3) + chips(1) + count(1) + grid(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);
    ScreenLayout {
        header: chunks[0],
        filters: chunks[1],
        chips: chunks[2],
        count: chunks[3],
        grid: chunks[4],
        status: chunks[5],
    }
}

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    grid::render(app, frame);

    if let Overlay::Open(_) = app.overlay {
        detail::render(app, frame);
    }

    if app.picker.is_some() {
        picker::render(app, frame);
    }

    // Render help overlay on top if active
    if app.show_help {
        help::render(frame);
    }
}

pub const STAR_PREFIX: &str = "Your rating: ";

/// The 5-star control. Unrated movies get five empty stars.
pub fn star_spans(rating: Option<UserRating>) -> Vec<Span<'static>> {
    let filled = rating.map(UserRating::stars).unwrap_or(0);
    let mut spans = vec![Span::styled(
        STAR_PREFIX,
        Style::default().fg(Color::Gray),
    )];
    for star in 1..=UserRating::MAX {
        let (symbol, color) = if star <= filled {
            ("★ ", Color::Yellow)
        } else {
            ("☆ ", Color::DarkGray)
        };
        spans.push(Span::styled(symbol, Style::default().fg(color)));
    }
    spans
}

/// Which star sits at `offset` columns from the start of the star line.
pub fn star_at(offset: u16) -> Option<UserRating> {
    let prefix = STAR_PREFIX.width() as u16;
    if offset < prefix {
        return None;
    }
    let star = (offset - prefix) / 2 + 1;
    UserRating::new(star as i64).ok()
}

/// Text under the star control, empty for unrated movies.
pub fn rated_line(rating: Option<UserRating>) -> String {
    match rating {
        Some(r) => format!("You rated: {} stars", r.stars()),
        None => String::new(),
    }
}

/// Truncate a string to `max_width` columns, adding "…" if truncated.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

/// Create a centered rectangle using percentage of parent area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

/// Centered rectangle of a fixed size, clipped to the parent.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
