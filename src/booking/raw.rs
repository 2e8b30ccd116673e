//! Reservation records as the Hostex API (or the relaying proxy) returns them.

use serde::Deserialize;
use serde_json::Value;

use super::error::{FetchError, FetchResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReservation {
    pub reservation_code: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub guest_name: Option<String>,
    pub guest_phone: Option<String>,
    pub channel_type: Option<String>,
    /// Older proxy responses carried the channel under this name.
    pub channel: Option<String>,
    pub custom_channel: Option<CustomChannel>,
    pub number_of_guests: Option<u32>,
    pub number_of_adults: Option<u32>,
    pub number_of_children: Option<u32>,
    pub status: Option<String>,
    pub rates: Option<Rates>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomChannel {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rates {
    pub rate: Option<RateValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateValue {
    pub amount: Option<Value>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope {
    Reservations { reservations: Vec<RawReservation> },
    Bookings { bookings: Vec<RawReservation> },
    Hostex { data: HostexPage },
    Bare(Vec<RawReservation>),
}

/// One page of `GET /v3/reservations`.
#[derive(Debug, Default, Deserialize)]
pub struct HostexPage {
    #[serde(default)]
    pub reservations: Vec<RawReservation>,
}

/// Accepts every response shape the proxy has been seen to return.
pub fn decode_reservations(body: &str) -> FetchResult<Vec<RawReservation>> {
    let value: Value = serde_json::from_str(body)?;
    let envelope: Envelope =
        serde_json::from_value(value).map_err(|err| FetchError::UnexpectedShape(err.to_string()))?;

    Ok(match envelope {
        Envelope::Reservations { reservations } => reservations,
        Envelope::Bookings { bookings } => bookings,
        Envelope::Hostex { data } => data.reservations,
        Envelope::Bare(list) => list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "reservation_code": "0-HM123",
        "check_in_date": "2024-02-10",
        "check_out_date": "2024-02-13",
        "guest_name": "Ada Lovelace",
        "channel_type": "airbnb",
        "number_of_guests": 2,
        "rates": { "rate": { "amount": 450.5, "currency": "EUR" } }
    }"#;

    #[test]
    fn decodes_every_known_envelope() {
        let shapes = [
            format!(r#"{{"reservations": [{RECORD}]}}"#),
            format!(r#"{{"bookings": [{RECORD}]}}"#),
            format!(r#"{{"data": {{"reservations": [{RECORD}]}}, "error_code": 200}}"#),
            format!("[{RECORD}]"),
        ];
        for body in shapes {
            let records = decode_reservations(&body).unwrap();
            assert_eq!(records.len(), 1, "{body}");
            assert_eq!(records[0].reservation_code.as_deref(), Some("0-HM123"));
            assert_eq!(records[0].number_of_guests, Some(2));
        }
    }

    #[test]
    fn empty_hostex_page() {
        let records = decode_reservations(r#"{"data": {}}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn unknown_shape_is_reported() {
        let err = decode_reservations(r#"{"error": "Proxy error"}"#).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedShape(_)));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = decode_reservations("<html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
