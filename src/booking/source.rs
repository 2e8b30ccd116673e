use std::path::PathBuf;
use std::time::Duration;

use chrono::{Days, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tracing::{debug, info, warn};

use super::error::{FetchError, FetchResult};
use super::model::NormalizedBooking;
use super::normalize::normalize_all;
use super::raw::{decode_reservations, RawReservation};
use crate::layout::CalendarMonth;

pub const HOSTEX_API_URL: &str = "https://api.hostex.io/v3/reservations";
pub const ACCESS_TOKEN_HEADER: &str = "Hostex-Access-Token";

/// Stop paginating after this many pages even if every page is full.
const MAX_PAGES: u32 = 200;

/// Where reservations come from.
#[derive(Debug, Clone)]
pub enum SourceMode {
    /// A relay that attaches the API key itself and returns JSON.
    Proxy { endpoint: String },
    /// The Hostex API, paginated by check-in date window.
    Direct { url: String, api_key: String },
    /// A JSON file in any of the accepted response shapes.
    File(PathBuf),
}

/// Check-in date range requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    pub fn around(anchor: NaiveDate, past_days: u64, future_days: u64) -> Self {
        Self {
            start: anchor.checked_sub_days(Days::new(past_days)).unwrap_or(NaiveDate::MIN),
            end: anchor.checked_add_days(Days::new(future_days)).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn covers(&self, month: &CalendarMonth) -> bool {
        self.start <= month.first_day() && month.last_day() <= self.end
    }
}

#[derive(Debug, Clone)]
pub struct ReservationSource {
    client: Client,
    mode: SourceMode,
    page_limit: u32,
    max_attempts: usize,
    base_backoff: Duration,
}

impl ReservationSource {
    pub fn builder(mode: SourceMode) -> ReservationSourceBuilder {
        ReservationSourceBuilder::new(mode)
    }

    pub fn mode(&self) -> &SourceMode {
        &self.mode
    }

    /// Fetch and normalize every reservation for `window`.
    pub async fn fetch(&self, window: FetchWindow) -> FetchResult<Vec<NormalizedBooking>> {
        let raw = match &self.mode {
            SourceMode::Proxy { endpoint } => {
                let body = self.get_text(endpoint, &[]).await?;
                decode_reservations(&body)?
            }
            SourceMode::Direct { url, api_key } => self.fetch_pages(url, api_key, window).await?,
            SourceMode::File(path) => {
                let body = tokio::fs::read_to_string(path).await?;
                decode_reservations(&body)?
            }
        };
        info!(count = raw.len(), start = %window.start, end = %window.end, "loaded reservations");
        Ok(normalize_all(&raw))
    }

    async fn fetch_pages(&self, url: &str, api_key: &str, window: FetchWindow) -> FetchResult<Vec<RawReservation>> {
        let mut all = Vec::new();
        let mut offset = 0u32;

        for page in 0..MAX_PAGES {
            let query = [
                ("start_check_in_date", window.start.format("%Y-%m-%d").to_string()),
                ("end_check_in_date", window.end.format("%Y-%m-%d").to_string()),
                ("limit", self.page_limit.to_string()),
                ("offset", offset.to_string()),
            ];
            let body = self.get_text_with_token(url, &query, Some(api_key)).await?;
            let reservations = decode_reservations(&body)?;
            let received = reservations.len();
            debug!(page, offset, received, "fetched reservation page");
            all.extend(reservations);

            if received < self.page_limit as usize {
                return Ok(all);
            }
            offset += self.page_limit;
        }

        warn!(pages = MAX_PAGES, "stopped paginating, results may be incomplete");
        Ok(all)
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> FetchResult<String> {
        self.get_text_with_token(url, query, None).await
    }

    /// GET with retries on server errors and transient transport failures.
    async fn get_text_with_token(
        &self,
        url: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> FetchResult<String> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let mut request = self.client.get(url).query(query);
            if let Some(token) = token {
                request = request.header(ACCESS_TOKEN_HEADER, token);
            }

            let result = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %url, %status, "received response");
                    if status.is_success() {
                        return Ok(response.text().await?);
                    }
                    let body = response.text().await.unwrap_or_default();
                    FetchError::Status {
                        status: status.as_u16(),
                        body: truncate(&body, 200),
                    }
                }
                Err(err) => FetchError::Http(err),
            };

            if attempt < attempts && result.is_retryable() {
                warn!(attempt, %url, error = %result, "request failed, retrying");
                self.sleep_with_backoff(attempt).await;
                attempt += 1;
                continue;
            }
            return Err(result);
        }
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    async fn sleep_with_backoff(&self, retry_number: usize) {
        let delay = self.backoff_delay(retry_number);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[derive(Debug)]
pub struct ReservationSourceBuilder {
    mode: SourceMode,
    timeout: Duration,
    page_limit: u32,
    max_attempts: usize,
    base_backoff: Duration,
}

impl ReservationSourceBuilder {
    fn new(mode: SourceMode) -> Self {
        Self {
            mode,
            timeout: Duration::from_secs(30),
            page_limit: 100,
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn page_limit(mut self, limit: u32) -> Self {
        self.page_limit = limit.max(1);
        self
    }

    /// Total attempts, initial try included.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn build(self) -> FetchResult<ReservationSource> {
        if let SourceMode::Direct { api_key, .. } = &self.mode {
            if api_key.trim().is_empty() {
                return Err(FetchError::EmptyApiKey);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ReservationSource {
            client,
            mode: self.mode,
            page_limit: self.page_limit,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
        })
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
