//! Reservations: the raw Hostex schema, normalization, and the fetch client.

pub mod error;
pub mod model;
pub mod normalize;
pub mod raw;
pub mod source;

pub use error::{FetchError, FetchResult};
pub use model::{ChannelClass, NormalizedBooking, Rate};
pub use source::{FetchWindow, ReservationSource, SourceMode};
