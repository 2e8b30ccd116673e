use tracing::warn;

use super::error::{LayoutError, LayoutResult};
use super::grid::{CalendarMonth, DAYS_PER_WEEK};
use crate::booking::NormalizedBooking;

const LAST_COLUMN: u32 = DAYS_PER_WEEK - 1;

/// How a bar piece sits within its week row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// The whole visible stay fits in one row.
    Single,
    /// First row of a stay that continues on the next row.
    Start,
    /// Interior row, spans the full week.
    Middle,
    /// Last row of a stay that started on an earlier row.
    End,
}

impl SegmentKind {
    pub fn opens(self) -> bool {
        matches!(self, SegmentKind::Single | SegmentKind::Start)
    }

    pub fn closes(self) -> bool {
        matches!(self, SegmentKind::Single | SegmentKind::End)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSegment {
    pub booking_id: String,
    pub week: u32,
    pub start_column: u32,
    /// Inclusive.
    pub end_column: u32,
    pub kind: SegmentKind,
}

impl BookingSegment {
    pub fn overlaps(&self, other: &BookingSegment) -> bool {
        self.week == other.week
            && self.start_column <= other.end_column
            && other.start_column <= self.end_column
    }

    pub fn columns(&self) -> std::ops::RangeInclusive<u32> {
        self.start_column..=self.end_column
    }
}

/// Place every booking on the month grid, in input order.
///
/// Bookings whose check-out is not after their check-in are dropped with a
/// warning instead of failing the whole month.
pub fn place_bookings(month: &CalendarMonth, bookings: &[NormalizedBooking]) -> Vec<BookingSegment> {
    let mut segments = Vec::new();
    for booking in bookings {
        match place_booking(month, booking) {
            Ok(placed) => segments.extend(placed),
            Err(err) => warn!(booking = %booking.id, error = %err, "skipping booking"),
        }
    }
    segments
}

/// Segments for a single booking, one per week row the visible part of the
/// stay touches. Empty when the stay does not intersect `month`.
pub fn place_booking(month: &CalendarMonth, booking: &NormalizedBooking) -> LayoutResult<Vec<BookingSegment>> {
    if booking.check_out <= booking.check_in {
        return Err(LayoutError::InvalidBookingRange {
            id: booking.id.clone(),
            check_in: booking.check_in,
            check_out: booking.check_out,
        });
    }

    // Check-out is exclusive: the bar ends on the last night.
    let Some(last_night) = booking.check_out.pred_opt() else {
        return Ok(Vec::new());
    };

    if last_night < month.first_day() || booking.check_in > month.last_day() {
        return Ok(Vec::new());
    }

    let start = month.coordinate_of_date(booking.check_in.max(month.first_day()))?;
    let end = month.coordinate_of_date(last_night.min(month.last_day()))?;

    let segments = (start.week..=end.week)
        .map(|week| {
            let (start_column, end_column, kind) = if week == start.week && week == end.week {
                (start.column, end.column, SegmentKind::Single)
            } else if week == start.week {
                (start.column, LAST_COLUMN, SegmentKind::Start)
            } else if week == end.week {
                (0, end.column, SegmentKind::End)
            } else {
                (0, LAST_COLUMN, SegmentKind::Middle)
            };

            BookingSegment {
                booking_id: booking.id.clone(),
                week,
                start_column,
                end_column,
                kind,
            }
        })
        .collect();

    Ok(segments)
}
