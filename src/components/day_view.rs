use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::LoadState;
use crate::booking::NormalizedBooking;
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        bookings: &[&NormalizedBooking],
        cursor: usize,
        load_state: &LoadState,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match bookings.len() {
            0 => String::new(),
            n => format!(" {} booking{} ", n, if n == 1 { "" } else { "s" }),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if bookings.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = match load_state {
                LoadState::Loading => Paragraph::new("Loading bookings...").style(theme.dim),
                LoadState::Failed(_) => {
                    Paragraph::new("Failed to load bookings. Press r to retry.").style(theme.error)
                }
                LoadState::Ready => Paragraph::new("No bookings").style(theme.dim),
            };
            frame.render_widget(msg.wrap(Wrap { trim: true }), inner);
            return;
        }

        let items: Vec<ListItem> = bookings
            .iter()
            .enumerate()
            .map(|(i, b)| format_booking(b, date, i == cursor))
            .collect();

        let list = List::new(items).block(block);
        frame.render_widget(list, area);
    }
}

fn role(booking: &NormalizedBooking, date: NaiveDate) -> &'static str {
    if booking.check_in == date {
        "in"
    } else if booking.check_out == date {
        "out"
    } else {
        "stay"
    }
}

fn format_booking(b: &NormalizedBooking, date: NaiveDate, selected: bool) -> ListItem<'static> {
    let theme = theme::current();
    let color = theme.channel_color(b.channel_class());
    let indicator = Span::styled("  ", Style::default().bg(color));

    let name_style = if selected {
        theme.selected
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let spans = vec![
        indicator,
        Span::styled(format!(" {:<4} ", role(b, date)), theme.dim),
        Span::styled(b.guest_name.clone(), name_style),
        Span::styled(format!(" {} ", b.guests_display()), Style::default()),
        Span::styled(format!("{} ", b.stay_display()), theme.dim),
        Span::styled(b.channel.clone(), Style::default().fg(color)),
    ];

    ListItem::new(Line::from(spans))
}

/// Render the booking detail popup overlay.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, booking: &NormalizedBooking) {
    let popup_w = area.width.clamp(30, 60).min(area.width);
    let popup_h = area.height.clamp(8, 16).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let color = theme::current().channel_color(booking.channel_class());
    let block = Block::default()
        .title(" Booking Details ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = detail_lines(booking, color);
    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<11}"), theme::DIM_STYLE),
        Span::styled(value, Style::default()),
    ])
}

fn detail_lines(b: &NormalizedBooking, color: Color) -> Vec<Line<'static>> {
    let na = || "N/A".to_string();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("  ", Style::default().bg(color)),
            Span::styled(format!(" {}", b.channel), Style::default()),
        ]),
        Line::from(""),
        field("Guest:", b.full_name.clone().unwrap_or_else(|| b.guest_name.clone())),
        field("Phone:", b.phone.clone().unwrap_or_else(na)),
        field(
            "Guests:",
            format!("{} ({} adults, {} children)", b.guest_count, b.adult_count, b.child_count),
        ),
        field("Check-in:", b.check_in.format("%a, %b %d, %Y").to_string()),
        field("Check-out:", b.check_out.format("%a, %b %d, %Y").to_string()),
        field("Nights:", b.nights().to_string()),
        field("Status:", b.status.clone().unwrap_or_else(na)),
    ];

    let rate = match &b.rate {
        Some(rate) => match &rate.currency {
            Some(currency) => format!("{} {}", rate.amount, currency),
            None => rate.amount.clone(),
        },
        None => na(),
    };
    lines.push(field("Rate:", rate));
    lines.push(field("Code:", b.id.clone()));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Press Esc to close", theme::DIM_STYLE)));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Rate;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn detail_lists_guest_and_rate() {
        let mut b = NormalizedBooking::new(
            "HM-9",
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 13).unwrap(),
        );
        b.full_name = Some("Ada Lovelace".into());
        b.guest_count = 3;
        b.adult_count = 2;
        b.child_count = 1;
        b.rate = Some(Rate {
            amount: "450".into(),
            currency: Some("EUR".into()),
        });

        let text: Vec<String> = detail_lines(&b, Color::Red).iter().map(line_text).collect();
        assert!(text.contains(&"Guest:     Ada Lovelace".to_string()));
        assert!(text.contains(&"Guests:    3 (2 adults, 1 children)".to_string()));
        assert!(text.contains(&"Phone:     N/A".to_string()));
        assert!(text.contains(&"Rate:      450 EUR".to_string()));
        assert!(text.contains(&"Nights:    3".to_string()));
    }

    #[test]
    fn role_on_day() {
        let b = NormalizedBooking::new(
            "x",
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 13).unwrap(),
        );
        assert_eq!(role(&b, b.check_in), "in");
        assert_eq!(role(&b, b.check_out), "out");
        assert_eq!(role(&b, NaiveDate::from_ymd_opt(2024, 2, 11).unwrap()), "stay");
    }
}
