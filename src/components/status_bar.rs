use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, LoadState};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let w = area.width as usize;

        let (left, left_style) = match &app.load_state {
            LoadState::Loading => (" Loading bookings... ".to_string(), theme.status),
            LoadState::Ready => (
                format!(" {} bookings ", app.bookings.len()),
                theme.status,
            ),
            LoadState::Failed(err) => (
                format!(" Failed to load bookings: {err} "),
                theme.status.patch(theme.error),
            ),
        };

        let right = if let Some(ref msg) = app.status_message {
            format!(" {msg} ")
        } else if matches!(app.load_state, LoadState::Failed(_)) {
            " r:Retry ?:Help q:Quit ".to_string()
        } else if w >= 80 {
            " hjkl:Nav [/]:Month t:Today Tab:Next Enter:Detail r:Reload ?:Help q:Quit ".to_string()
        } else if w >= 50 {
            " [/]:Month Enter:Detail q:Quit ".to_string()
        } else {
            " ?:Help q:Quit ".to_string()
        };

        let left: String = left.chars().take(w.saturating_sub(right.chars().count())).collect();
        let padding_len = w.saturating_sub(left.chars().count() + right.chars().count());

        let line = Line::from(vec![
            Span::styled(left, left_style),
            Span::styled(" ".repeat(padding_len), theme.status),
            Span::styled(right, theme.status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}
