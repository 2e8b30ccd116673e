use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use super::model::{NormalizedBooking, Rate};
use super::raw::RawReservation;

/// Turn raw reservations into bookings, dropping records without usable
/// dates. Order is preserved.
pub fn normalize_all(raw: &[RawReservation]) -> Vec<NormalizedBooking> {
    let bookings: Vec<NormalizedBooking> = raw
        .iter()
        .enumerate()
        .filter_map(|(index, record)| normalize(index, record))
        .collect();
    debug!(received = raw.len(), kept = bookings.len(), "normalized reservations");
    bookings
}

pub fn normalize(index: usize, raw: &RawReservation) -> Option<NormalizedBooking> {
    let id = non_blank(raw.reservation_code.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("reservation-{index}"));

    let (Some(check_in), Some(check_out)) = (
        raw.check_in_date.as_deref().and_then(parse_date),
        raw.check_out_date.as_deref().and_then(parse_date),
    ) else {
        warn!(
            reservation = %id,
            check_in = ?raw.check_in_date,
            check_out = ?raw.check_out_date,
            "reservation has no usable stay dates"
        );
        return None;
    };

    let full_name = non_blank(raw.guest_name.as_deref()).map(str::to_string);

    Some(NormalizedBooking {
        id,
        guest_name: first_name(raw.guest_name.as_deref()),
        channel: channel_name(raw),
        check_in,
        check_out,
        guest_count: raw.number_of_guests.unwrap_or(1),
        adult_count: raw.number_of_adults.unwrap_or(0),
        child_count: raw.number_of_children.unwrap_or(0),
        full_name,
        phone: non_blank(raw.guest_phone.as_deref()).map(str::to_string),
        status: non_blank(raw.status.as_deref()).map(str::to_string),
        rate: rate(raw),
    })
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn first_name(guest_name: Option<&str>) -> String {
    guest_name
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or("Guest")
        .to_string()
}

/// Custom channel name, then channel type, then "Unknown".
pub fn channel_name(raw: &RawReservation) -> String {
    raw.custom_channel
        .as_ref()
        .and_then(|c| non_blank(c.name.as_deref()))
        .or_else(|| non_blank(raw.channel_type.as_deref()))
        .or_else(|| non_blank(raw.channel.as_deref()))
        .unwrap_or("Unknown")
        .to_string()
}

fn rate(raw: &RawReservation) -> Option<Rate> {
    let rate = raw.rates.as_ref()?.rate.as_ref()?;
    let amount = match rate.amount.as_ref()? {
        Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    Some(Rate {
        amount,
        currency: non_blank(rate.currency.as_deref()).map(str::to_string),
    })
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::raw::{CustomChannel, RateValue, Rates};

    fn record() -> RawReservation {
        RawReservation {
            reservation_code: Some("HM-1".into()),
            check_in_date: Some("2024-02-10".into()),
            check_out_date: Some("2024-02-13T11:00:00Z".into()),
            guest_name: Some("  Ada   Lovelace ".into()),
            ..Default::default()
        }
    }

    #[test]
    fn fills_defaults() {
        let b = normalize(0, &record()).unwrap();
        assert_eq!(b.id, "HM-1");
        assert_eq!(b.guest_name, "Ada");
        assert_eq!(b.full_name.as_deref(), Some("Ada   Lovelace"));
        assert_eq!(b.channel, "Unknown");
        assert_eq!(b.check_in, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(b.check_out, NaiveDate::from_ymd_opt(2024, 2, 13).unwrap());
        assert_eq!((b.guest_count, b.adult_count, b.child_count), (1, 0, 0));
        assert!(b.rate.is_none());
    }

    #[test]
    fn channel_fallback_chain() {
        let mut r = record();
        r.channel_type = Some("booking_site".into());
        assert_eq!(channel_name(&r), "booking_site");

        r.custom_channel = Some(CustomChannel { name: Some("Website".into()) });
        assert_eq!(channel_name(&r), "Website");

        r.custom_channel = Some(CustomChannel { name: Some("  ".into()) });
        assert_eq!(channel_name(&r), "booking_site");
    }

    #[test]
    fn missing_guest_name_becomes_guest() {
        assert_eq!(first_name(None), "Guest");
        assert_eq!(first_name(Some("   ")), "Guest");
        assert_eq!(first_name(Some("Grace Hopper")), "Grace");
    }

    #[test]
    fn records_without_dates_are_skipped_and_ids_fall_back_to_index() {
        let mut broken = record();
        broken.check_in_date = Some("soon".into());
        let mut anonymous = record();
        anonymous.reservation_code = None;

        let bookings = normalize_all(&[broken, anonymous]);
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].id, "reservation-1");
    }

    #[test]
    fn rate_accepts_numbers_and_strings() {
        let mut r = record();
        r.rates = Some(Rates {
            rate: Some(RateValue {
                amount: Some(serde_json::json!(450.5)),
                currency: Some("EUR".into()),
            }),
        });
        let rate = normalize(0, &r).unwrap().rate.unwrap();
        assert_eq!(rate.amount, "450.5");
        assert_eq!(rate.currency.as_deref(), Some("EUR"));

        r.rates = Some(Rates {
            rate: Some(RateValue {
                amount: Some(serde_json::json!("120")),
                currency: None,
            }),
        });
        assert_eq!(normalize(0, &r).unwrap().rate.unwrap().amount, "120");
    }

    #[test]
    fn parse_date_variants() {
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("").is_none());
        assert_eq!(parse_date(" 2024-02-29 "), NaiveDate::from_ymd_opt(2024, 2, 29));
    }
}
