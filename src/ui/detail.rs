use super::{centered_rect, contains, star_at, star_spans};
use crate::app::App;
use crate::movie::UserRating;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn overlay_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

/// Overlay rect plus its rating and body regions.
fn overlay_layout(viewport: Rect) -> (Rect, Rect, Rect) {
    let area = centered_rect(80, 80, viewport);
    let inner = overlay_block().inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);
    (area, chunks[0], chunks[2])
}

/// What a click lands on while the overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailHit {
    Star(UserRating),
    Inside,
    Backdrop,
}

pub fn hit_test(app: &App, column: u16, row: u16) -> DetailHit {
    let (area, rating_area, _) = overlay_layout(app.viewport);
    if !contains(area, column, row) {
        return DetailHit::Backdrop;
    }
    if row == rating_area.y && column >= rating_area.x {
        if let Some(rating) = star_at(column - rating_area.x) {
            return DetailHit::Star(rating);
        }
    }
    DetailHit::Inside
}

fn poster_line<'a>(app: &'a App, poster: &'a str) -> Line<'a> {
    let mut spans = vec![
        Span::styled("Poster: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.posters.detail_url(poster),
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ),
    ];
    if app.posters.is_pending(poster) {
        spans.push(Span::styled(" (checking)", Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

pub fn render(app: &App, frame: &mut Frame) {
    let Some(movie) = app.detail_movie() else {
        return;
    };
    let (area, rating_area, body_area) = overlay_layout(frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);
    let block = overlay_block()
        .title(Span::styled(
            format!(" {} ", movie.title),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(
            Line::from(" Esc close · 1-5 rate · o poster ")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right),
        );
    frame.render_widget(block, area);

    // ── Rating control ──
    let rated = match movie.user_rating {
        Some(r) => Span::styled(
            format!("You rated: {} stars", r.stars()),
            Style::default().fg(Color::Green),
        ),
        None => Span::styled("Not rated yet", Style::default().fg(Color::DarkGray)),
    };
    let rating_lines = vec![Line::from(star_spans(movie.user_rating)), Line::from(rated)];
    frame.render_widget(Paragraph::new(rating_lines), rating_area);

    // ── Metadata ──
    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::DarkGray));
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                movie.year.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::raw(movie.runtime.as_str()),
            Span::raw("   "),
            Span::styled(
                format!("★ {:.1}/10", movie.rating),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![label("Genres: "), Span::raw(movie.genre.join(", "))]),
        Line::from(""),
        Line::from(vec![label("Director: "), Span::raw(movie.director.as_str())]),
        Line::from(vec![label("Cast: "), Span::raw(movie.cast.join(", "))]),
        Line::from(vec![
            label("Country: "),
            Span::raw(movie.country.as_str()),
            Span::raw("   "),
            label("Language: "),
            Span::raw(movie.language.as_str()),
        ]),
        poster_line(app, &movie.poster),
        Line::from(""),
        Line::from(Span::styled(
            "Plot",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    lines.push(Line::from(movie.plot.as_str()));

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(body, body_area);
}
