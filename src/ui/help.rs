use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<12}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("  Global"),
        binding("?", "Toggle this help"),
        binding("q", "Quit application"),
        binding("Ctrl+C", "Quit from anywhere"),
        Line::from(""),
        section("  Catalog"),
        binding("←↑↓→ hjkl", "Move between cards"),
        binding("Home/End", "First/last card"),
        binding("Enter", "Open movie details"),
        binding("1-5", "Rate the selected movie"),
        binding("o", "Open the poster in a browser"),
        binding("Click", "Open details (click a star to rate)"),
        Line::from(""),
        section("  Filters"),
        binding("/", "Search titles (type to filter)"),
        binding("g / y", "Choose genre / year"),
        binding("Esc", "Clear the search"),
        binding("Backspace", "Delete the last search character"),
        binding("r", "Reset all filters"),
        binding("Click chip", "Remove that filter"),
        Line::from(""),
        section("  Details"),
        binding("1-5", "Rate this movie"),
        binding("↑/↓", "Scroll"),
        binding("Esc/q", "Close (or click outside)"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help — Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
