use crate::catalog::{Catalog, GenreFilter, YearFilter};
use crate::movie::{Movie, MovieId, UserRating};
use crate::poster::PosterResolver;
use crate::ui;
use ratatui::layout::Rect;
use tracing::{debug, info};

/// Detail overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Closed,
    Open(MovieId),
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which dropdown a picker is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Genre,
    Year,
}

impl PickerKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Genre => "Genre",
            Self::Year => "Year",
        }
    }
}

/// An open dropdown: its options and the highlighted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub kind: PickerKind,
    pub options: Vec<String>,
    pub selected: usize,
}

/// A removable active-filter chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Search,
    Genre,
    Year,
}

/// Main application state.
pub struct App {
    pub catalog: Catalog,
    pub posters: PosterResolver,
    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub overlay: Overlay,
    pub picker: Option<Picker>,

    // Grid state, `selected` indexes the derived view
    pub selected: usize,
    pub scroll_row: usize,
    pub viewport: Rect,

    pub detail_scroll: u16,
    pub status_msg: String,
}

impl App {
    pub fn new(catalog: Catalog, posters: PosterResolver) -> Self {
        let status_msg = format!("{} movies loaded", catalog.movies().len());
        Self {
            catalog,
            posters,
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            overlay: Overlay::Closed,
            picker: None,
            selected: 0,
            scroll_row: 0,
            viewport: Rect::new(0, 0, 120, 40),
            detail_scroll: 0,
            status_msg,
        }
    }

    /// Record the terminal size used for grid geometry and hit-testing.
    pub fn update_viewport(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        self.ensure_visible();
    }

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.catalog.derived_view().get(self.selected).copied()
    }

    pub fn detail_movie(&self) -> Option<&Movie> {
        match self.overlay {
            Overlay::Open(id) => self.catalog.movie(id),
            Overlay::Closed => None,
        }
    }

    // ── Filter intents ──

    pub fn push_search_char(&mut self, c: char) {
        let mut search = self.catalog.selection().search.clone();
        search.push(c);
        self.catalog.set_search_term(search);
        self.after_filter_change();
    }

    pub fn pop_search_char(&mut self) {
        let mut search = self.catalog.selection().search.clone();
        search.pop();
        self.catalog.set_search_term(search);
        self.after_filter_change();
    }

    pub fn clear_chip(&mut self, chip: Chip) {
        match chip {
            Chip::Search => self.catalog.set_search_term(""),
            Chip::Genre => self.catalog.set_genre_filter(GenreFilter::All),
            Chip::Year => self.catalog.set_year_filter(YearFilter::All),
        }
        self.after_filter_change();
    }

    pub fn reset_filters(&mut self) {
        self.catalog.reset_filters();
        self.after_filter_change();
        self.status_msg = "Filters cleared".to_string();
    }

    pub fn open_picker(&mut self, kind: PickerKind) {
        let (options, current): (Vec<String>, String) = match kind {
            PickerKind::Genre => (
                self.catalog
                    .available_genres()
                    .iter()
                    .map(|g| g.to_string())
                    .collect(),
                self.catalog.selection().genre.to_string(),
            ),
            PickerKind::Year => (
                self.catalog
                    .available_years()
                    .iter()
                    .map(|y| y.to_string())
                    .collect(),
                self.catalog.selection().year.to_string(),
            ),
        };
        let selected = options.iter().position(|o| *o == current).unwrap_or(0);
        self.picker = Some(Picker {
            kind,
            options,
            selected,
        });
    }

    pub fn picker_next(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            if picker.selected + 1 < picker.options.len() {
                picker.selected += 1;
            }
        }
    }

    pub fn picker_prev(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.selected = picker.selected.saturating_sub(1);
        }
    }

    /// Apply the highlighted option and close the picker.
    pub fn picker_confirm(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let Some(choice) = picker.options.get(picker.selected).cloned() else {
            return;
        };
        match picker.kind {
            PickerKind::Genre => self.catalog.set_genre_filter(choice),
            PickerKind::Year => self.catalog.set_year_filter(choice),
        }
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
        let stats = self.catalog.stats();
        debug!(
            filtered = stats.filtered_count,
            selection = ?self.catalog.selection(),
            "filters changed"
        );
        self.status_msg = match stats.filtered_count {
            0 => "No movies found".to_string(),
            1 => "1 movie found".to_string(),
            n => format!("{} movies found", n),
        };
    }

    // ── Rating intents ──

    /// Rate a movie by id. Unknown ids leave everything untouched.
    pub fn rate(&mut self, id: MovieId, rating: UserRating) {
        if self.catalog.rate_movie(id, rating) {
            if let Some(movie) = self.catalog.movie(id) {
                info!(id, stars = rating.stars(), "user rating set");
                self.status_msg = format!("Rated \"{}\" {}", movie.title, rating);
            }
        }
    }

    /// Rate the movie in the detail overlay, or the selected card.
    pub fn rate_current(&mut self, rating: UserRating) {
        let target = match self.overlay {
            Overlay::Open(id) => Some(id),
            Overlay::Closed => self.selected_movie().map(|m| m.id),
        };
        if let Some(id) = target {
            self.rate(id, rating);
        }
    }

    // ── Detail overlay ──

    pub fn open_detail(&mut self, id: MovieId) {
        let Some(poster) = self.catalog.movie(id).map(|m| m.poster.clone()) else {
            return;
        };
        self.posters.request(&poster);
        self.overlay = Overlay::Open(id);
        self.detail_scroll = 0;
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_movie().map(|m| m.id) {
            self.open_detail(id);
        }
    }

    pub fn close_detail(&mut self) {
        self.overlay = Overlay::Closed;
    }

    pub fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    // ── Grid navigation ──

    fn view_len(&self) -> usize {
        self.catalog.stats().filtered_count
    }

    fn grid(&self) -> ui::grid::GridGeometry {
        ui::grid::geometry(ui::screen_layout(self.viewport).grid)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.view_len() {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    pub fn select_down(&mut self) {
        let columns = self.grid().columns;
        if self.selected + columns < self.view_len() {
            self.selected += columns;
        } else if self.view_len() > 0 {
            self.selected = self.view_len() - 1;
        }
        self.ensure_visible();
    }

    pub fn select_up(&mut self) {
        let columns = self.grid().columns;
        self.selected = self.selected.saturating_sub(columns);
        self.ensure_visible();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.ensure_visible();
    }

    pub fn select_last(&mut self) {
        self.selected = self.view_len().saturating_sub(1);
        self.ensure_visible();
    }

    pub fn select_index(&mut self, index: usize) {
        if index < self.view_len() {
            self.selected = index;
            self.ensure_visible();
        }
    }

    /// Scroll so the selected card's row is on screen.
    fn ensure_visible(&mut self) {
        let grid = self.grid();
        let row = self.selected / grid.columns;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + grid.visible_rows {
            self.scroll_row = row + 1 - grid.visible_rows;
        }
    }

    /// Start poster checks for every card on screen and the open overlay.
    pub fn request_visible_posters(&mut self) {
        let grid = self.grid();
        let first = self.scroll_row * grid.columns;
        let view = self.catalog.derived_view();
        let on_screen = view
            .iter()
            .skip(first)
            .take(grid.columns * grid.visible_rows);
        for movie in on_screen {
            self.posters.request(&movie.poster);
        }
        if let Overlay::Open(id) = self.overlay {
            if let Some(movie) = self.catalog.movie(id) {
                self.posters.request(&movie.poster);
            }
        }
    }

    /// Open the selected movie's poster with the system handler.
    pub fn open_poster(&mut self) {
        let url = match self.detail_movie() {
            Some(m) => self.posters.detail_url(&m.poster).to_string(),
            None => match self.selected_movie() {
                Some(m) => self.posters.display_url(&m.poster).to_string(),
                None => return,
            },
        };
        match std::process::Command::new("xdg-open").arg(&url).spawn() {
            Ok(_) => self.status_msg = format!("Opening: {}", url),
            Err(_) => self.status_msg = format!("Poster: {} (no browser available)", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{movie, sample_catalog};
    use crate::catalog::{ALL_GENRES, ALL_YEARS};
    use crate::config::Configuration;
    use crate::poster::PosterStatus;

    fn app() -> App {
        App::new(sample_catalog(), PosterResolver::new(&Configuration::default(), true))
    }

    fn stars(n: i64) -> UserRating {
        UserRating::new(n).unwrap()
    }

    #[test]
    fn test_typing_updates_search_and_resets_selection() {
        let mut app = app();
        app.select_last();
        assert_eq!(app.selected, 2);

        for c in "quiet".chars() {
            app.push_search_char(c);
        }
        assert_eq!(app.catalog.selection().search, "quiet");
        assert_eq!(app.selected, 0);
        assert_eq!(app.status_msg, "2 movies found");

        app.pop_search_char();
        assert_eq!(app.catalog.selection().search, "quie");
    }

    #[test]
    fn test_genre_picker_selects_option() {
        let mut app = app();
        app.open_picker(PickerKind::Genre);
        let picker = app.picker.as_ref().unwrap();
        assert_eq!(
            picker.options,
            vec!["Action", ALL_GENRES, "Comedy", "Drama"]
        );
        assert_eq!(picker.options[picker.selected], ALL_GENRES);

        app.picker_next();
        app.picker_next();
        app.picker_confirm();
        assert!(app.picker.is_none());
        assert_eq!(
            app.catalog.selection().genre,
            GenreFilter::Only("Drama".to_string())
        );
        assert_eq!(app.catalog.derived_view().len(), 2);
    }

    #[test]
    fn test_year_picker_starts_on_sentinel() {
        let mut app = app();
        app.open_picker(PickerKind::Year);
        let picker = app.picker.as_ref().unwrap();
        assert_eq!(picker.options, vec![ALL_YEARS, "2020", "2015", "2010"]);
        assert_eq!(picker.selected, 0);

        app.picker_prev();
        app.picker_next();
        app.picker_confirm();
        assert_eq!(app.catalog.selection().year, YearFilter::from(2020));
    }

    #[test]
    fn test_clear_chip_only_clears_that_filter() {
        let mut app = app();
        app.catalog.set_search_term("q");
        app.catalog.set_genre_filter("Drama");
        app.catalog.set_year_filter("2010");

        app.clear_chip(Chip::Genre);
        assert_eq!(app.catalog.selection().genre, GenreFilter::All);
        assert_eq!(app.catalog.selection().search, "q");
        assert_eq!(app.catalog.selection().year, YearFilter::from(2010));
    }

    #[test]
    fn test_rate_current_targets_selected_card() {
        let mut app = app();
        app.select_next();
        app.rate_current(stars(4));
        assert_eq!(app.catalog.movie(2).unwrap().user_rating, Some(stars(4)));
        assert_eq!(app.catalog.stats().rated_movies, 1);
    }

    #[test]
    fn test_rate_current_prefers_open_overlay() {
        let mut app = app();
        app.open_detail(3);
        assert_eq!(app.overlay, Overlay::Open(3));

        app.rate_current(stars(2));
        assert_eq!(app.catalog.movie(3).unwrap().user_rating, Some(stars(2)));
        assert_eq!(app.catalog.movie(1).unwrap().user_rating, None);

        app.close_detail();
        assert_eq!(app.overlay, Overlay::Closed);
        assert!(app.detail_movie().is_none());
    }

    #[test]
    fn test_open_detail_unknown_id_stays_closed() {
        let mut app = app();
        app.open_detail(42);
        assert_eq!(app.overlay, Overlay::Closed);
    }

    #[test]
    fn test_rate_unknown_id_keeps_status() {
        let mut app = app();
        let before = app.status_msg.clone();
        app.rate(999, stars(5));
        assert_eq!(app.status_msg, before);
        assert_eq!(app.catalog.stats().rated_movies, 0);
    }

    #[test]
    fn test_grid_navigation_scrolls() {
        let movies = (1..=30)
            .map(|i| movie(i, &format!("Movie {}", i), 2000, &["Drama"], 5.0))
            .collect();
        let mut app = App::new(
            Catalog::new(movies).unwrap(),
            PosterResolver::new(&Configuration::default(), true),
        );
        app.update_viewport(80, 30);
        let grid = ui::grid::geometry(ui::screen_layout(app.viewport).grid);

        app.select_last();
        assert_eq!(app.selected, 29);
        let last_row = 29 / grid.columns;
        assert!(app.scroll_row <= last_row);
        assert!(last_row < app.scroll_row + grid.visible_rows);

        app.select_first();
        assert_eq!(app.scroll_row, 0);

        app.select_down();
        assert_eq!(app.selected, grid.columns.min(29));
        app.select_up();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_request_visible_posters_covers_screen_only() {
        let movies = (1..=30)
            .map(|i| movie(i, &format!("Movie {}", i), 2000, &["Drama"], 5.0))
            .collect();
        let mut app = App::new(
            Catalog::new(movies).unwrap(),
            PosterResolver::new(&Configuration::default(), true),
        );
        app.update_viewport(80, 30);
        let grid = ui::grid::geometry(ui::screen_layout(app.viewport).grid);
        let on_screen = grid.columns * grid.visible_rows;
        assert!(on_screen < 30);

        app.request_visible_posters();
        let view = app.catalog.derived_view();
        assert_eq!(app.posters.status(&view[0].poster), PosterStatus::Available);
        assert_eq!(
            app.posters.status(&view[on_screen - 1].poster),
            PosterStatus::Available
        );
        assert_eq!(
            app.posters.status(&view[on_screen].poster),
            PosterStatus::Unchecked
        );
    }

    #[test]
    fn test_open_detail_requests_poster() {
        let mut app = app();
        let poster = app.catalog.movie(3).unwrap().poster.clone();
        app.open_detail(3);
        assert_eq!(app.posters.status(&poster), PosterStatus::Available);
    }

    #[test]
    fn test_reset_filters() {
        let mut app = app();
        app.catalog.set_genre_filter("Action");
        app.reset_filters();
        assert!(!app.catalog.has_active_filters());
        assert_eq!(app.catalog.derived_view().len(), 3);
    }
}
