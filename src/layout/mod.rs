//! Calendar geometry: the month grid and the placement of booking bars on it.
//!
//! Everything here is pure. Callers own the "current month" and the booking
//! list and recompute on every change.

pub mod error;
pub mod grid;
pub mod placer;

pub use error::{LayoutError, LayoutResult};
pub use grid::{CalendarMonth, DayCoordinate, DAYS_PER_WEEK};
pub use placer::{place_booking, place_bookings, BookingSegment, SegmentKind};
