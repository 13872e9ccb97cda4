use super::{centered_fixed, contains};
use crate::app::{App, Picker};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

const PICKER_WIDTH: u16 = 32;
const MAX_ROWS: u16 = 12;

fn picker_area(picker: &Picker, viewport: Rect) -> Rect {
    let rows = (picker.options.len() as u16).clamp(1, MAX_ROWS);
    centered_fixed(PICKER_WIDTH, rows + 2, viewport)
}

/// First visible option, keeping the highlighted one on screen.
fn scroll_offset(picker: &Picker, visible: usize) -> usize {
    if visible == 0 || picker.selected < visible {
        0
    } else {
        picker.selected + 1 - visible
    }
}

/// Index of the option under the mouse, or `None` outside the list.
pub fn hit_test(app: &App, column: u16, row: u16) -> Option<usize> {
    let picker = app.picker.as_ref()?;
    let area = picker_area(picker, app.viewport);
    let inner = Block::default().borders(Borders::ALL).inner(area);
    if !contains(inner, column, row) {
        return None;
    }
    let index = scroll_offset(picker, inner.height as usize) + (row - inner.y) as usize;
    (index < picker.options.len()).then_some(index)
}

pub fn render(app: &App, frame: &mut Frame) {
    let Some(picker) = app.picker.as_ref() else {
        return;
    };
    let area = picker_area(picker, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", picker.kind.label()));
    let visible = block.inner(area).height as usize;

    let items: Vec<ListItem> = picker
        .options
        .iter()
        .map(|option| ListItem::new(format!(" {}", option)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default()
        .with_offset(scroll_offset(picker, visible))
        .with_selected(Some(picker.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::PickerKind;
    use crate::catalog::tests::sample_catalog;
    use crate::config::Configuration;
    use crate::poster::PosterResolver;

    #[test]
    fn test_scroll_offset() {
        let mut picker = Picker {
            kind: PickerKind::Year,
            options: (0..20).map(|i| i.to_string()).collect(),
            selected: 3,
        };
        assert_eq!(scroll_offset(&picker, 12), 0);
        picker.selected = 15;
        assert_eq!(scroll_offset(&picker, 12), 4);
    }

    #[test]
    fn test_hit_test_rows() {
        let mut app = App::new(
            sample_catalog(),
            PosterResolver::new(&Configuration::default(), true),
        );
        app.update_viewport(100, 40);
        assert_eq!(hit_test(&app, 50, 20), None);

        app.open_picker(PickerKind::Year);
        let area = picker_area(app.picker.as_ref().unwrap(), app.viewport);
        assert_eq!(hit_test(&app, area.x + 2, area.y + 1), Some(0));
        assert_eq!(hit_test(&app, area.x + 2, area.y + 4), Some(3));
        assert_eq!(hit_test(&app, area.x + 2, area.y), None);
        assert_eq!(hit_test(&app, 0, 0), None);
    }
}
