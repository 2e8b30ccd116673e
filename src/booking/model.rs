use chrono::NaiveDate;

/// A reservation reduced to what the calendar needs.
///
/// `check_out` is exclusive: the stay occupies `[check_in, check_out)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBooking {
    pub id: String,
    /// First name only, as shown on the bar.
    pub guest_name: String,
    pub channel: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_count: u32,
    pub adult_count: u32,
    pub child_count: u32,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
    pub rate: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rate {
    pub amount: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelClass {
    Airbnb,
    Booking,
    Direct,
    Other,
}

impl ChannelClass {
    pub fn from_channel(channel: &str) -> Self {
        match channel.trim().to_lowercase().as_str() {
            "airbnb" => ChannelClass::Airbnb,
            "booking.com" | "booking_site" | "booking" => ChannelClass::Booking,
            "direct" | "hostex_direct" => ChannelClass::Direct,
            _ => ChannelClass::Other,
        }
    }
}

impl NormalizedBooking {
    /// A booking with default guest details. Mostly useful for tests and for
    /// loading hand-written fixtures.
    pub fn new(id: impl Into<String>, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            id: id.into(),
            guest_name: "Guest".to_string(),
            channel: "Unknown".to_string(),
            check_in,
            check_out,
            guest_count: 1,
            adult_count: 0,
            child_count: 0,
            full_name: None,
            phone: None,
            status: None,
            rate: None,
        }
    }

    /// Number of nights; zero or negative for malformed records.
    pub fn nights(&self) -> i64 {
        self.check_out.signed_duration_since(self.check_in).num_days()
    }

    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// Occupied, arriving, or departing on `date`.
    pub fn touches(&self, date: NaiveDate) -> bool {
        self.occupies(date) || self.check_out == date
    }

    pub fn channel_class(&self) -> ChannelClass {
        ChannelClass::from_channel(&self.channel)
    }

    pub fn guests_display(&self) -> String {
        let n = self.guest_count;
        format!("{} guest{}", n, if n == 1 { "" } else { "s" })
    }

    pub fn stay_display(&self) -> String {
        let n = self.nights();
        format!(
            "{} - {} ({} night{})",
            self.check_in.format("%b %d"),
            self.check_out.format("%b %d"),
            n,
            if n == 1 { "" } else { "s" }
        )
    }
}
