//! Turning placed segments into something visible.
//!
//! Front ends implement [`Renderer`]; they all consume the same
//! [`MonthLayout`] and share the bar geometry helpers below.

pub mod lanes;
pub mod text;

use crate::booking::NormalizedBooking;
use crate::layout::{place_bookings, BookingSegment, CalendarMonth};

pub use lanes::assign_lanes;
pub use text::TextRenderer;

/// Left and right bar edge for arrivals and departures.
pub const SLANT: char = '╱';

pub trait Renderer {
    fn render(&mut self, layout: &MonthLayout<'_>);
}

/// Everything a front end needs to draw one month.
#[derive(Debug, Clone)]
pub struct MonthLayout<'a> {
    pub month: CalendarMonth,
    pub segments: Vec<BookingSegment>,
    /// Stacking lane of each segment, parallel to `segments`.
    pub lanes: Vec<usize>,
    pub bookings: &'a [NormalizedBooking],
}

impl<'a> MonthLayout<'a> {
    pub fn new(month: CalendarMonth, bookings: &'a [NormalizedBooking]) -> Self {
        let segments = place_bookings(&month, bookings);
        Self::from_segments(month, segments, bookings)
    }

    pub fn from_segments(month: CalendarMonth, segments: Vec<BookingSegment>, bookings: &'a [NormalizedBooking]) -> Self {
        let lanes = assign_lanes(&segments);
        Self {
            month,
            segments,
            lanes,
            bookings,
        }
    }

    pub fn booking(&self, id: &str) -> Option<&'a NormalizedBooking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Segments on `week` with their lane.
    pub fn week(&self, week: u32) -> impl Iterator<Item = (&BookingSegment, usize)> {
        self.segments
            .iter()
            .zip(self.lanes.iter().copied())
            .filter(move |(segment, _)| segment.week == week)
    }

    pub fn lanes_in_week(&self, week: u32) -> usize {
        self.week(week).map(|(_, lane)| lane + 1).max().unwrap_or(0)
    }
}

/// Horizontal extent of a bar inside a week row, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSpan {
    pub x: u16,
    pub width: u16,
}

/// Arrivals start a third into the check-in cell; departures leave a one
/// cell gap so adjacent stays stay distinguishable.
pub fn bar_span(segment: &BookingSegment, cell_width: u16) -> BarSpan {
    let inset = if segment.kind.opens() { cell_width / 3 } else { 0 };
    let x = segment.start_column as u16 * cell_width + inset;
    let end = ((segment.end_column as u16 + 1) * cell_width).saturating_sub(u16::from(segment.kind.closes()));
    BarSpan {
        x,
        width: end.saturating_sub(x).max(1),
    }
}

/// Bar contents of exactly `width` characters. Only the segment carrying the
/// arrival shows the guest label.
pub fn bar_text(segment: &BookingSegment, booking: Option<&NormalizedBooking>, width: usize, fill: char) -> String {
    let mut chars = vec![fill; width];
    if width == 0 {
        return String::new();
    }
    if segment.kind.opens() {
        chars[0] = SLANT;
    }
    if segment.kind.closes() && width > 1 {
        chars[width - 1] = SLANT;
    }

    if let Some(booking) = booking.filter(|_| segment.kind.opens()) {
        let label = format!("{} ({})", booking.guest_name, booking.guest_count);
        let room = width.saturating_sub(1 + usize::from(segment.kind.closes()));
        for (slot, ch) in chars.iter_mut().skip(1).zip(label.chars().take(room)) {
            *slot = ch;
        }
    }

    chars.into_iter().collect()
}
