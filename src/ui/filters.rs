use super::{ScreenLayout, contains, screen_layout};
use crate::app::{App, Chip, InputMode, PickerKind};
use crate::catalog::{GenreFilter, YearFilter};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const CHIPS_LABEL: &str = " Active filters: ";
const CHIP_GAP: u16 = 1;

/// Search box, genre dropdown and year dropdown.
fn filter_boxes(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn search_label(mode: &InputMode) -> &'static str {
    match mode {
        InputMode::Editing => " Search by title (Enter to apply): ",
        InputMode::Normal => " Search by title (/): ",
    }
}

/// Active chips in display order, with their text.
fn chips(app: &App) -> Vec<(Chip, String, Color)> {
    let selection = app.catalog.selection();
    let mut chips = Vec::new();
    if !selection.search.is_empty() {
        chips.push((
            Chip::Search,
            format!(" Search: \"{}\" × ", selection.search),
            Color::Magenta,
        ));
    }
    if let GenreFilter::Only(genre) = &selection.genre {
        chips.push((Chip::Genre, format!(" Genre: {} × ", genre), Color::Green));
    }
    if let YearFilter::Only(year) = &selection.year {
        chips.push((Chip::Year, format!(" Year: {} × ", year), Color::Blue));
    }
    chips
}

pub fn render(app: &App, frame: &mut Frame, layout: ScreenLayout) {
    let [search_area, genre_area, year_area] = filter_boxes(layout.filters);
    let selection = app.catalog.selection();

    let search_style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let search_text = format!("{}{}", search_label(&app.input_mode), selection.search);
    let search_bar = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style)
            .title(" Search Movies "),
    );
    frame.render_widget(search_bar, search_area);

    let dropdown = |title: &'static str, value: &str, kind: PickerKind| {
        let open = app.picker.as_ref().is_some_and(|p| p.kind == kind);
        let style = if open {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {}", value), style),
            Span::styled(" ▾", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
    };
    frame.render_widget(
        dropdown(" Genre (g) ", selection.genre.label(), PickerKind::Genre),
        genre_area,
    );
    frame.render_widget(
        dropdown(" Year (y) ", selection.year.label(), PickerKind::Year),
        year_area,
    );

    // ── Active filter chips ──
    let chips = chips(app);
    if !chips.is_empty() {
        let mut spans = vec![Span::styled(
            CHIPS_LABEL,
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )];
        for (_, text, color) in chips {
            spans.push(Span::styled(
                text,
                Style::default().fg(Color::Black).bg(color),
            ));
            spans.push(Span::raw(" ".repeat(CHIP_GAP as usize)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), layout.chips);
    }
}

pub fn set_search_cursor(app: &App, frame: &mut Frame, layout: ScreenLayout) {
    let [search_area, _, _] = filter_boxes(layout.filters);
    let label = search_label(&app.input_mode);
    let cursor_x = search_area.x
        + 1
        + label.width() as u16
        + app.catalog.selection().search.width() as u16;
    let max_x = search_area.x + search_area.width.saturating_sub(2);
    frame.set_cursor_position((cursor_x.min(max_x), search_area.y + 1));
}

/// What a click on the filter area landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterHit {
    Search,
    Dropdown(PickerKind),
    Chip(Chip),
}

pub fn hit_test(app: &App, column: u16, row: u16) -> Option<FilterHit> {
    let layout = screen_layout(app.viewport);
    let [search_area, genre_area, year_area] = filter_boxes(layout.filters);
    if contains(search_area, column, row) {
        return Some(FilterHit::Search);
    }
    if contains(genre_area, column, row) {
        return Some(FilterHit::Dropdown(PickerKind::Genre));
    }
    if contains(year_area, column, row) {
        return Some(FilterHit::Dropdown(PickerKind::Year));
    }
    if !contains(layout.chips, column, row) {
        return None;
    }

    let mut x = layout.chips.x + CHIPS_LABEL.width() as u16;
    for (chip, text, _) in chips(app) {
        let width = text.width() as u16;
        if column >= x && column < x + width {
            return Some(FilterHit::Chip(chip));
        }
        x += width + CHIP_GAP;
    }
    None
}
