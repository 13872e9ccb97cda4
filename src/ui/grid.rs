use super::{contains, filters, rated_line, screen_layout, star_at, star_spans, truncate_str};
use crate::app::{App, InputMode};
use crate::catalog::Stats;
use crate::movie::{Movie, MovieId, UserRating};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const CARD_MIN_WIDTH: u16 = 34;
pub const CARD_HEIGHT: u16 = 10;
/// Row of the star control inside a card's border.
const STAR_ROW: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub columns: usize,
    pub visible_rows: usize,
    pub card_width: u16,
}

pub fn geometry(area: Rect) -> GridGeometry {
    let columns = (area.width / CARD_MIN_WIDTH).max(1);
    GridGeometry {
        columns: columns as usize,
        visible_rows: (area.height / CARD_HEIGHT).max(1) as usize,
        card_width: (area.width / columns).max(1),
    }
}

/// Screen rect of the card at `index` in the derived view, if on screen.
fn card_rect(area: Rect, grid: GridGeometry, scroll_row: usize, index: usize) -> Option<Rect> {
    let row = index / grid.columns;
    if row < scroll_row || row >= scroll_row + grid.visible_rows {
        return None;
    }
    let col = (index % grid.columns) as u16;
    let rect = Rect::new(
        area.x + col * grid.card_width,
        area.y + (row - scroll_row) as u16 * CARD_HEIGHT,
        grid.card_width,
        CARD_HEIGHT,
    );
    Some(rect.intersection(area))
}

/// What a mouse click on the grid landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridHit {
    Card { index: usize, id: MovieId },
    Star { id: MovieId, rating: UserRating },
}

/// Resolve a click. A star hit wins over the card it sits in, so rating a
/// movie never opens its detail overlay.
pub fn hit_test(app: &App, column: u16, row: u16) -> Option<GridHit> {
    let area = screen_layout(app.viewport).grid;
    if !contains(area, column, row) {
        return None;
    }
    let grid = geometry(area);
    let view = app.catalog.derived_view();
    let first = app.scroll_row * grid.columns;
    let last = (first + grid.columns * grid.visible_rows).min(view.len());

    for (index, movie) in view.iter().enumerate().take(last).skip(first) {
        let Some(rect) = card_rect(area, grid, app.scroll_row, index) else {
            continue;
        };
        if !contains(rect, column, row) {
            continue;
        }
        let star_line = rect.y + 1 + STAR_ROW;
        if row == star_line && column > rect.x {
            if let Some(rating) = star_at(column - rect.x - 1) {
                return Some(GridHit::Star {
                    id: movie.id,
                    rating,
                });
            }
        }
        return Some(GridHit::Card {
            index,
            id: movie.id,
        });
    }
    None
}

pub fn render(app: &App, frame: &mut Frame) {
    let layout = screen_layout(frame.area());
    let stats = app.catalog.stats();

    // ── Header ──
    let header = Paragraph::new(header_line(&stats, app.catalog.has_active_filters())).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, layout.header);

    filters::render(app, frame, layout);

    // ── Result count ──
    let found = match stats.filtered_count {
        0 => "No movies found".to_string(),
        1 => "1 movie found".to_string(),
        n => format!("{} movies found", n),
    };
    let mut count_spans = vec![Span::styled(
        format!(" {}", found),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];
    if stats.filtered_count > 0 {
        count_spans.push(Span::styled(
            format!("   Showing {} of {} movies", stats.filtered_count, stats.total_movies),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(count_spans)), layout.count);

    // ── Grid ──
    let view = app.catalog.derived_view();
    if view.is_empty() {
        render_empty(frame, layout.grid);
    } else {
        let grid = geometry(layout.grid);
        for (index, movie) in view.iter().enumerate() {
            if let Some(rect) = card_rect(layout.grid, grid, app.scroll_row, index) {
                render_card(app, frame, rect, movie, index == app.selected);
            }
        }
    }

    // ── Status bar ──
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    };
    let status_line = Line::from(vec![
        key(" ←↑↓→"),
        Span::raw(" Navigate  "),
        key("/"),
        Span::raw(" Search  "),
        key("g/y"),
        Span::raw(" Genre/Year  "),
        key("1-5"),
        Span::raw(" Rate  "),
        key("Enter"),
        Span::raw(" Detail  "),
        key("r"),
        Span::raw(" Reset  "),
        key("?"),
        Span::raw(" Help  "),
        key("q"),
        Span::raw(" Quit  "),
        Span::styled(&app.status_msg, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), layout.status);

    if app.input_mode == InputMode::Editing {
        filters::set_search_cursor(app, frame, layout);
    }
}

/// Title, stats and, while any filter is set, a reset hint.
fn header_line(stats: &Stats, filtered: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            " Movie Explorer ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Discover and rate movies    ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            stats.filtered_count.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Movies   "),
        Span::styled(
            stats.rated_movies.to_string(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Rated   "),
        Span::styled(
            format!("{:.1}", stats.average_rating),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Avg Rating"),
    ];
    if filtered {
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            "r",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(" Reset filters", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn render_card(app: &App, frame: &mut Frame, area: Rect, movie: &Movie, selected: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let border_style = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let poster = app.posters.display_url(&movie.poster);

    let lines = vec![
        Line::from(Span::styled(
            truncate_str(&movie.title, inner_width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("★ {:.1}", movie.rating), Style::default().fg(Color::Yellow)),
            Span::raw("  "),
            Span::styled(movie.year.to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            truncate_str(&movie.genre_summary(), inner_width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled("Director: ", Style::default().fg(Color::DarkGray)),
            Span::raw(truncate_str(&movie.director, inner_width.saturating_sub(10))),
        ]),
        Line::from(vec![
            Span::styled("Runtime: ", Style::default().fg(Color::DarkGray)),
            Span::raw(movie.runtime.as_str()),
        ]),
        Line::from(Span::styled(
            truncate_str(poster, inner_width),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(star_spans(movie.user_rating)),
        Line::from(Span::styled(
            rated_line(movie.user_rating),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(card, area);
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No movies found",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Try adjusting your search criteria or filters to find more movies.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("r", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" to clear all filters"),
        ]),
    ];
    let empty = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(empty, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::config::Configuration;
    use crate::poster::PosterResolver;
    use crate::ui::STAR_PREFIX;
    use unicode_width::UnicodeWidthStr;

    fn app() -> App {
        let mut app = App::new(
            sample_catalog(),
            PosterResolver::new(&Configuration::default(), true),
        );
        app.update_viewport(100, 40);
        app
    }

    #[test]
    fn test_geometry() {
        let grid = geometry(Rect::new(0, 8, 100, 31));
        assert_eq!(grid.columns, 2);
        assert_eq!(grid.card_width, 50);
        assert_eq!(grid.visible_rows, 3);

        let narrow = geometry(Rect::new(0, 0, 10, 4));
        assert_eq!(narrow.columns, 1);
        assert_eq!(narrow.visible_rows, 1);
    }

    #[test]
    fn test_click_on_card_body_opens_card() {
        let app = app();
        let grid = screen_layout(app.viewport).grid;
        // Second card of the first row, on its title line.
        let hit = hit_test(&app, grid.x + 55, grid.y + 1);
        assert_eq!(hit, Some(GridHit::Card { index: 1, id: 2 }));
    }

    #[test]
    fn test_click_on_star_rates_without_opening() {
        let app = app();
        let grid = screen_layout(app.viewport).grid;
        let star_x = grid.x + 1 + STAR_PREFIX.width() as u16 + 2 * 3;
        let star_y = grid.y + 1 + STAR_ROW;
        let hit = hit_test(&app, star_x, star_y);
        assert_eq!(
            hit,
            Some(GridHit::Star {
                id: 1,
                rating: UserRating::new(4).unwrap()
            })
        );
    }

    #[test]
    fn test_click_on_star_prefix_is_card() {
        let app = app();
        let grid = screen_layout(app.viewport).grid;
        let hit = hit_test(&app, grid.x + 2, grid.y + 1 + STAR_ROW);
        assert_eq!(hit, Some(GridHit::Card { index: 0, id: 1 }));
    }

    #[test]
    fn test_click_outside_cards() {
        let app = app();
        let grid = screen_layout(app.viewport).grid;
        // Three movies in two columns: the second row has one card.
        assert_eq!(hit_test(&app, grid.x + 60, grid.y + CARD_HEIGHT + 2), None);
        assert_eq!(hit_test(&app, 0, 0), None);
    }

    fn header_text(app: &App) -> String {
        header_line(&app.catalog.stats(), app.catalog.has_active_filters())
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn test_header_shows_reset_hint_only_when_filtered() {
        let mut app = app();
        let text = header_text(&app);
        assert!(text.contains("3 Movies"));
        assert!(text.contains("7.0 Avg Rating"));
        assert!(!text.contains("Reset filters"));

        app.catalog.set_genre_filter("Drama");
        let text = header_text(&app);
        assert!(text.contains("2 Movies"));
        assert!(text.contains("r Reset filters"));
    }
}
