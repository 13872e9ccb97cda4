mod app;
mod catalog;
mod config;
mod data;
mod error;
mod movie;
mod poster;
mod ui;

use app::{App, InputMode, Overlay};
use catalog::Catalog;
use clap::{Args, Parser, Subcommand};
use config::Configuration;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use movie::UserRating;
use poster::PosterResolver;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use ui::detail::DetailHit;
use ui::filters::FilterHit;
use ui::grid::GridHit;

const LOG_ENV: &str = "MOVIE_EXPLORER_LOG";

/// Browse, filter and rate a movie catalog in the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON catalog to load instead of the bundled one
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Do not check poster URLs over the network
    #[arg(long, global = true)]
    offline: bool,

    /// Write logs here instead of the cache directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Print the movies matching the filters
    List(FilterArgs),
    /// Print catalog statistics for the filters
    Stats(FilterArgs),
    /// Print the genre choices
    Genres,
    /// Print the year choices
    Years,
}

#[derive(Args)]
struct FilterArgs {
    /// Case-insensitive title substring
    #[arg(short, long)]
    search: Option<String>,
    /// Exact genre
    #[arg(short, long)]
    genre: Option<String>,
    /// Release year
    #[arg(short, long)]
    year: Option<String>,
}

impl FilterArgs {
    fn apply(self, catalog: &mut Catalog) {
        if let Some(search) = self.search {
            catalog.set_search_term(search);
        }
        if let Some(genre) = self.genre {
            catalog.set_genre_filter(genre);
        }
        if let Some(year) = self.year {
            catalog.set_year_filter(year);
        }
    }
}

fn init_tracing(
    default_filter: &str,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match Configuration::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}", e.user_message());
            Configuration::default()
        }
    };

    // The TUI owns the terminal, so logs always go to a file
    if let Some(log_path) = cli.log_file.clone().or_else(Configuration::default_log_path) {
        if let Err(e) = init_tracing(&config.log_filter, &log_path) {
            eprintln!("Warning: logging disabled: {e}");
        }
    }

    let catalog_path = cli.catalog.clone().or_else(|| config.catalog_path.clone());
    let mut catalog = match data::load_catalog(catalog_path.as_deref()) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(error = %e, "failed to load catalog");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List(filter) => {
            filter.apply(&mut catalog);
            for movie in catalog.derived_view() {
                println!(
                    "{:>4}  {} ({})  [{}]  ★ {:.1}",
                    movie.id,
                    movie.title,
                    movie.year,
                    movie.genre.join(", "),
                    movie.rating
                );
            }
        }
        Commands::Stats(filter) => {
            filter.apply(&mut catalog);
            let stats = catalog.stats();
            println!("Total movies:   {}", stats.total_movies);
            println!("Matching:       {}", stats.filtered_count);
            println!("Rated by you:   {}", stats.rated_movies);
            println!("Average rating: {:.1}", stats.average_rating);
        }
        Commands::Genres => {
            for genre in catalog.available_genres() {
                println!("{}", genre);
            }
        }
        Commands::Years => {
            for year in catalog.available_years() {
                println!("{}", year);
            }
        }
        Commands::Run => {
            let posters = PosterResolver::new(&config, cli.offline);
            let mut app = App::new(catalog, posters);
            info!(movies = app.catalog.movies().len(), "starting browser");

            // Init terminal
            let mut terminal = ratatui::init();
            crossterm::execute!(std::io::stdout(), EnableMouseCapture)?;

            let size = terminal.size()?;
            app.update_viewport(size.width, size.height);

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
            ratatui::restore();

            if let Err(e) = result {
                error!(error = %e, "browser exited with error");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
            info!(rated = app.catalog.stats().rated_movies, "session ended");
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Fold in finished poster checks and start new ones for what is on screen
        app.posters.drain();
        app.request_visible_posters();

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(std::time::Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    handle_mouse(app, mouse);
                }
                Event::Resize(width, height) => {
                    app.update_viewport(width, height);
                }
                _ => {}
            }
        }
    }
}

/// Map `1`-`5` to a rating.
fn rating_key(c: char) -> Option<UserRating> {
    let digit = c.to_digit(10)?;
    UserRating::new(digit as i64).ok()
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_search_input(app, key);
        return;
    }

    // Help toggle (global)
    if key.code == KeyCode::Char('?') {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.picker.is_some() {
        handle_picker_key(app, key);
        return;
    }

    match app.overlay {
        Overlay::Open(_) => handle_detail_key(app, key),
        Overlay::Closed => handle_grid_key(app, key),
    }
}

/// Plain or shifted characters only. Ctrl and Alt chords are not text.
fn is_text_input(key: &KeyEvent) -> bool {
    key.modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.pop_search_char();
        }
        KeyCode::Char(c) if is_text_input(&key) => {
            app.push_search_char(c);
        }
        _ => {}
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.picker = None;
        }
        KeyCode::Down | KeyCode::Char('j') => app.picker_next(),
        KeyCode::Up | KeyCode::Char('k') => app.picker_prev(),
        KeyCode::Enter => app.picker_confirm(),
        _ => {}
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('g') => app.open_picker(app::PickerKind::Genre),
        KeyCode::Char('y') => app.open_picker(app::PickerKind::Year),
        KeyCode::Char('r') => app.reset_filters(),
        KeyCode::Char('o') => app.open_poster(),
        KeyCode::Right | KeyCode::Char('l') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::PageDown => app.select_down(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => app.select_up(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char(c) => {
            if let Some(rating) = rating_key(c) {
                app.rate_current(rating);
            }
        }
        KeyCode::Esc => {
            // Clear search
            if !app.catalog.selection().search.is_empty() {
                app.clear_chip(app::Chip::Search);
            }
        }
        KeyCode::Backspace => {
            if !app.catalog.selection().search.is_empty() {
                app.pop_search_char();
            }
        }
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
        KeyCode::Char('o') => app.open_poster(),
        KeyCode::Char(c) => {
            if let Some(rating) = rating_key(c) {
                app.rate_current(rating);
            }
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (column, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollDown => {
            match app.overlay {
                Overlay::Open(_) => app.scroll_down(),
                Overlay::Closed => app.select_down(),
            }
            return;
        }
        MouseEventKind::ScrollUp => {
            match app.overlay {
                Overlay::Open(_) => app.scroll_up(),
                Overlay::Closed => app.select_up(),
            }
            return;
        }
        _ => return,
    }

    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.picker.is_some() {
        match ui::picker::hit_test(app, column, row) {
            Some(index) => {
                if let Some(picker) = app.picker.as_mut() {
                    picker.selected = index;
                }
                app.picker_confirm();
            }
            None => app.picker = None,
        }
        return;
    }

    if let Overlay::Open(_) = app.overlay {
        match ui::detail::hit_test(app, column, row) {
            DetailHit::Star(rating) => app.rate_current(rating),
            DetailHit::Backdrop => app.close_detail(),
            DetailHit::Inside => {}
        }
        return;
    }

    let filter_hit = ui::filters::hit_test(app, column, row);
    if filter_hit != Some(FilterHit::Search) {
        app.input_mode = InputMode::Normal;
    }
    match filter_hit {
        Some(FilterHit::Search) => app.input_mode = InputMode::Editing,
        Some(FilterHit::Dropdown(kind)) => app.open_picker(kind),
        Some(FilterHit::Chip(chip)) => app.clear_chip(chip),
        None => match ui::grid::hit_test(app, column, row) {
            Some(GridHit::Star { id, rating }) => app.rate(id, rating),
            Some(GridHit::Card { index, id }) => {
                app.select_index(index);
                app.open_detail(id);
            }
            None => {}
        },
    }
}
