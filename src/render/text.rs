use std::fmt::Write;

use super::{bar_span, bar_text, MonthLayout, Renderer};
use crate::layout::grid::DAY_NAMES;
use crate::layout::DAYS_PER_WEEK;

/// Plain-text month grid, one line of day numbers per week followed by one
/// line per booking lane.
pub struct TextRenderer {
    cell_width: u16,
    output: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TextRenderer {
    pub fn new(cell_width: u16) -> Self {
        Self {
            cell_width: cell_width.max(4),
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, layout: &MonthLayout<'_>) {
        let cw = self.cell_width as usize;
        let row_width = cw * DAYS_PER_WEEK as usize;
        let month = &layout.month;

        let _ = writeln!(self.output, "{:^row_width$}", month.title());

        let header: String = DAY_NAMES.iter().map(|d| format!("{d:<cw$}")).collect();
        let _ = writeln!(self.output, "{}", header.trim_end());

        for week in 0..month.week_count() {
            let days: String = (0..DAYS_PER_WEEK)
                .map(|column| match month.day_of_month_at(week, column) {
                    Some(day) => format!("{day:<cw$}"),
                    None => " ".repeat(cw),
                })
                .collect();
            let _ = writeln!(self.output, "{}", days.trim_end());

            for lane in 0..layout.lanes_in_week(week) {
                let mut line = vec![' '; row_width];
                for (segment, _) in layout.week(week).filter(|(_, l)| *l == lane) {
                    let span = bar_span(segment, self.cell_width);
                    let booking = layout.booking(&segment.booking_id);
                    let text = bar_text(segment, booking, span.width as usize, '=');
                    for (slot, ch) in line.iter_mut().skip(span.x as usize).zip(text.chars()) {
                        *slot = ch;
                    }
                }
                let line: String = line.into_iter().collect();
                let _ = writeln!(self.output, "{}", line.trim_end());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::booking::NormalizedBooking;
    use crate::layout::CalendarMonth;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn renders_grid_and_bars() {
        let mut ada = NormalizedBooking::new("a", date(10), date(13));
        ada.guest_name = "Ada".into();
        ada.guest_count = 2;
        let bookings = vec![ada];

        let layout = MonthLayout::new(CalendarMonth::new(2024, 2).unwrap(), &bookings);
        let mut renderer = TextRenderer::new(10);
        renderer.render(&layout);
        let lines: Vec<&str> = renderer.output().lines().collect();

        assert_eq!(lines[0].trim(), "February 2024");
        assert!(lines[1].starts_with("Mon       Tue"));
        // Week 0: Thursday the 1st through Sunday the 4th.
        assert_eq!(lines[2], format!("{}1         2         3         4", " ".repeat(30)));
        // Week 0 has no bars, so week 1 follows directly.
        assert!(lines[3].starts_with("5         6"));
        // Saturday the 10th: bar starts a third into column 5.
        let bar = lines[4];
        assert_eq!(bar.find('╱'), Some(53));
        assert!(bar.contains("Ada (2)"));
        // Week 2 opens with the departure piece ending on Monday the 12th.
        assert!(lines[5].starts_with("12        13"));
        assert_eq!(lines[6], "========╱");
    }

    #[test]
    fn overlapping_bookings_get_their_own_lines() {
        let bookings = vec![
            NormalizedBooking::new("a", date(13), date(15)),
            NormalizedBooking::new("b", date(14), date(16)),
        ];
        let layout = MonthLayout::new(CalendarMonth::new(2024, 2).unwrap(), &bookings);
        assert_eq!(layout.lanes, vec![0, 1]);

        let mut renderer = TextRenderer::default();
        renderer.render(&layout);
        let week_two: Vec<&str> = renderer
            .output()
            .lines()
            .skip_while(|l| !l.starts_with("12"))
            .take(3)
            .collect();
        assert_eq!(week_two.len(), 3);
        assert!(week_two[1].contains("Guest (1)"));
        assert!(week_two[2].contains("Guest (1)"));
    }
}
