use chrono::NaiveDate;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::layout::grid::DAY_NAMES;
use crate::layout::DAYS_PER_WEEK;
use crate::render::{bar_span, bar_text, MonthLayout, Renderer, SLANT};
use crate::theme;

/// Month grid with booking bars, drawn straight into a ratatui buffer.
pub struct MonthView<'b> {
    buf: &'b mut Buffer,
    area: Rect,
    selected_date: NaiveDate,
    today: NaiveDate,
}

impl<'b> MonthView<'b> {
    pub fn new(buf: &'b mut Buffer, area: Rect, selected_date: NaiveDate, today: NaiveDate) -> Self {
        Self {
            buf,
            area,
            selected_date,
            today,
        }
    }

    fn day_style(&self, date: NaiveDate) -> Style {
        let theme = theme::current();
        if date == self.today && date == self.selected_date {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if date == self.selected_date {
            theme.selected
        } else if date == self.today {
            theme.today
        } else {
            Style::default()
        }
    }

    fn put(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(ch).set_style(style);
        }
    }
}

impl Renderer for MonthView<'_> {
    fn render(&mut self, layout: &MonthLayout<'_>) {
        let theme = theme::current();
        let month = layout.month;

        let block = Block::default()
            .title(format!(" {} ", month.title()))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);
        let inner = block.inner(self.area);
        block.render(self.area, self.buf);

        let cw = inner.width / DAYS_PER_WEEK as u16;
        if cw < 3 || inner.height < 3 {
            return;
        }

        for (i, name) in DAY_NAMES.iter().enumerate() {
            let x = inner.x + i as u16 * cw;
            self.buf
                .set_stringn(x, inner.y, format!(" {name}"), cw as usize, theme.header);
        }

        let weeks = month.week_count() as u16;
        let row_h = (inner.height.saturating_sub(1) / weeks).max(1);

        for week in 0..month.week_count() {
            let row_y = inner.y + 1 + week as u16 * row_h;
            if row_y >= inner.bottom() {
                break;
            }

            for column in 0..DAYS_PER_WEEK {
                let Some(day) = month.day_of_month_at(week, column) else {
                    continue;
                };
                let Ok(date) = month.date_of(day) else {
                    continue;
                };
                let x = inner.x + column as u16 * cw;
                let style = self.day_style(date);
                self.buf.set_stringn(x, row_y, format!(" {day}"), cw as usize, style);
            }

            let capacity = row_h.saturating_sub(1) as usize;
            let lanes = layout.lanes_in_week(week);
            if lanes > capacity {
                let marker = format!("+{}", lanes - capacity);
                let x = inner.right().saturating_sub(marker.len() as u16);
                self.buf.set_string(x, row_y, marker, theme.dim);
            }

            for (segment, lane) in layout.week(week) {
                if lane >= capacity {
                    continue;
                }
                let y = row_y + 1 + lane as u16;
                let span = bar_span(segment, cw);
                let booking = layout.booking(&segment.booking_id);
                let color = booking
                    .map(|b| theme.channel_color(b.channel_class()))
                    .unwrap_or(theme.other);
                let body = Style::default()
                    .fg(Color::White)
                    .bg(color)
                    .add_modifier(Modifier::BOLD);
                let edge = Style::default().fg(color);

                let text = bar_text(segment, booking, span.width as usize, ' ');
                for (i, ch) in text.chars().enumerate() {
                    let x = inner.x + span.x + i as u16;
                    if x >= inner.right() {
                        break;
                    }
                    self.put(x, y, ch, if ch == SLANT { edge } else { body });
                }
            }
        }
    }
}
