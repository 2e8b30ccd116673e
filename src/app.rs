use chrono::{Datelike, Days, Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::booking::{FetchWindow, NormalizedBooking};
use crate::layout::{place_bookings, BookingSegment, CalendarMonth};
use crate::render::MonthLayout;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// A fetch the main loop should start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub window: FetchWindow,
}

/// Result of a finished fetch, tagged with the generation that asked for it.
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub window: FetchWindow,
    pub result: Result<Vec<NormalizedBooking>, String>,
}

pub struct App {
    pub running: bool,
    pub month: CalendarMonth,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub bookings: Vec<NormalizedBooking>,
    pub segments: Vec<BookingSegment>,
    pub load_state: LoadState,
    /// Index into `day_bookings()` of the highlighted booking.
    pub day_cursor: usize,
    /// Booking id shown in the detail popup.
    pub detail: Option<String>,
    pub show_help: bool,
    pub status_message: Option<String>,
    window_past_days: u64,
    window_future_days: u64,
    fetched_window: Option<FetchWindow>,
    requested_window: Option<FetchWindow>,
    requested: u64,
    applied: u64,
}

impl App {
    pub fn new(month: Option<CalendarMonth>, window_past_days: u64, window_future_days: u64) -> Self {
        let today = Local::now().date_naive();
        let month = month.unwrap_or_else(|| CalendarMonth::containing(today));
        let selected_date = if month.contains(today) { today } else { month.first_day() };

        Self {
            running: true,
            month,
            selected_date,
            today,
            bookings: Vec::new(),
            segments: Vec::new(),
            load_state: LoadState::Loading,
            day_cursor: 0,
            detail: None,
            show_help: false,
            status_message: None,
            window_past_days,
            window_future_days,
            fetched_window: None,
            requested_window: None,
            requested: 0,
            applied: 0,
        }
    }

    pub fn layout(&self) -> MonthLayout<'_> {
        MonthLayout::from_segments(self.month, self.segments.clone(), &self.bookings)
    }

    /// Start a new fetch anchored on today, or on the displayed month when
    /// today's window would not cover it.
    pub fn request_fetch(&mut self) -> FetchRequest {
        let anchor = if self.window_at(self.today).covers(&self.month) {
            self.today
        } else {
            self.month.first_day()
        };
        self.requested += 1;
        self.load_state = LoadState::Loading;
        let request = FetchRequest {
            generation: self.requested,
            window: self.window_at(anchor),
        };
        self.requested_window = Some(request.window);
        debug!(generation = request.generation, start = %request.window.start, end = %request.window.end, "requesting bookings");
        request
    }

    /// Apply a finished fetch. Results older than the last applied one are
    /// dropped so a slow, superseded request never overwrites newer data.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation <= self.applied {
            debug!(generation = outcome.generation, applied = self.applied, "ignoring stale fetch");
            return false;
        }
        self.applied = outcome.generation;
        let latest = outcome.generation == self.requested;

        match outcome.result {
            Ok(bookings) => {
                info!(generation = outcome.generation, count = bookings.len(), "bookings loaded");
                self.bookings = bookings;
                self.fetched_window = Some(outcome.window);
                self.load_state = if latest { LoadState::Ready } else { LoadState::Loading };
                self.relayout();
            }
            Err(message) => {
                warn!(generation = outcome.generation, error = %message, "failed to load bookings");
                if latest {
                    self.load_state = LoadState::Failed(message);
                }
            }
        }
        true
    }

    /// Recompute segments for the displayed month.
    pub fn relayout(&mut self) {
        self.segments = place_bookings(&self.month, &self.bookings);
        self.clamp_cursor();
    }

    /// Bookings occupying, arriving, or departing on the selected date.
    pub fn day_bookings(&self) -> Vec<&NormalizedBooking> {
        self.bookings
            .iter()
            .filter(|b| b.nights() > 0 && b.touches(self.selected_date))
            .collect()
    }

    pub fn detail_booking(&self) -> Option<&NormalizedBooking> {
        let id = self.detail.as_deref()?;
        self.bookings.iter().find(|b| b.id == id)
    }

    /// Returns a fetch request when the new month leaves the fetched window.
    pub fn next_day(&mut self) -> Option<FetchRequest> {
        let date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.select_date(date)
    }

    pub fn prev_day(&mut self) -> Option<FetchRequest> {
        let date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.select_date(date)
    }

    pub fn next_week(&mut self) -> Option<FetchRequest> {
        let date = self.selected_date.checked_add_days(Days::new(7)).unwrap_or(self.selected_date);
        self.select_date(date)
    }

    pub fn prev_week(&mut self) -> Option<FetchRequest> {
        let date = self.selected_date.checked_sub_days(Days::new(7)).unwrap_or(self.selected_date);
        self.select_date(date)
    }

    pub fn next_month(&mut self) -> Option<FetchRequest> {
        let target = self.month.succ()?;
        self.jump_to_month(target)
    }

    pub fn prev_month(&mut self) -> Option<FetchRequest> {
        let target = self.month.pred()?;
        self.jump_to_month(target)
    }

    pub fn go_to_today(&mut self) -> Option<FetchRequest> {
        self.today = Local::now().date_naive();
        self.select_date(self.today)
    }

    pub fn cursor_down(&mut self) {
        let n = self.day_bookings().len();
        if n > 0 {
            self.day_cursor = (self.day_cursor + 1) % n;
        }
    }

    pub fn show_detail(&mut self) {
        let id = self
            .day_bookings()
            .get(self.day_cursor)
            .map(|b| b.id.clone());
        match id {
            Some(id) => self.detail = Some(id),
            None => self.status_message = Some("No booking on this day".to_string()),
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    fn jump_to_month(&mut self, target: CalendarMonth) -> Option<FetchRequest> {
        let day = self.selected_date.day().min(target.days_in_month());
        let date = target.date_of(day).unwrap_or(target.first_day());
        self.select_date(date)
    }

    fn select_date(&mut self, date: NaiveDate) -> Option<FetchRequest> {
        self.selected_date = date;
        self.day_cursor = 0;

        let month = CalendarMonth::containing(date);
        if month == self.month {
            return None;
        }
        self.month = month;
        self.relayout();

        // While a fetch is in flight its result replaces the loaded bookings,
        // so only its window counts.
        let loaded = if self.applied < self.requested {
            self.requested_window
        } else {
            self.fetched_window
        };
        if loaded.is_some_and(|w| w.covers(&month)) {
            None
        } else {
            Some(self.request_fetch())
        }
    }

    fn window_at(&self, anchor: NaiveDate) -> FetchWindow {
        FetchWindow::around(anchor, self.window_past_days, self.window_future_days)
    }

    fn clamp_cursor(&mut self) {
        let n = self.day_bookings().len();
        if self.day_cursor >= n {
            self.day_cursor = n.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app_in(year: i32, month: u32) -> App {
        App::new(Some(CalendarMonth::new(year, month).unwrap()), 30, 150)
    }

    fn outcome(request: FetchRequest, bookings: Vec<NormalizedBooking>) -> FetchOutcome {
        FetchOutcome {
            generation: request.generation,
            window: request.window,
            result: Ok(bookings),
        }
    }

    #[test]
    fn loaded_bookings_are_placed_on_the_grid() {
        let mut app = app_in(2024, 2);
        let request = app.request_fetch();
        assert_eq!(app.load_state, LoadState::Loading);

        let applied = app.apply_fetch(outcome(
            request,
            vec![NormalizedBooking::new("a", date(2024, 2, 10), date(2024, 2, 13))],
        ));
        assert!(applied);
        assert_eq!(app.load_state, LoadState::Ready);
        assert_eq!(app.segments.len(), 2);
    }

    #[test]
    fn stale_fetch_is_ignored() {
        let mut app = app_in(2024, 2);
        let first = app.request_fetch();
        let second = app.request_fetch();

        assert!(app.apply_fetch(outcome(second, vec![NormalizedBooking::new(
            "new",
            date(2024, 2, 1),
            date(2024, 2, 2)
        )])));
        assert!(!app.apply_fetch(outcome(first, vec![])));
        assert_eq!(app.bookings[0].id, "new");
        assert_eq!(app.load_state, LoadState::Ready);
    }

    #[test]
    fn older_fetch_finishing_first_keeps_loading_state() {
        let mut app = app_in(2024, 2);
        let first = app.request_fetch();
        let _second = app.request_fetch();
        assert!(app.apply_fetch(outcome(first, vec![])));
        assert_eq!(app.load_state, LoadState::Loading);
    }

    #[test]
    fn failure_is_reported_and_keeps_previous_bookings() {
        let mut app = app_in(2024, 2);
        let first = app.request_fetch();
        app.apply_fetch(outcome(first, vec![NormalizedBooking::new("a", date(2024, 2, 1), date(2024, 2, 3))]));

        let retry = app.request_fetch();
        app.apply_fetch(FetchOutcome {
            generation: retry.generation,
            window: retry.window,
            result: Err("connection refused".into()),
        });
        assert_eq!(app.load_state, LoadState::Failed("connection refused".into()));
        assert_eq!(app.bookings.len(), 1);
    }

    #[test]
    fn month_navigation_clamps_the_day_and_rolls_over() {
        let mut app = app_in(2024, 1);
        app.selected_date = date(2024, 1, 31);
        app.next_month();
        assert_eq!(app.selected_date, date(2024, 2, 29));
        assert_eq!(app.month, CalendarMonth::new(2024, 2).unwrap());

        let mut app = app_in(2024, 1);
        app.selected_date = date(2024, 1, 15);
        app.prev_month();
        assert_eq!(app.selected_date, date(2023, 12, 15));
    }

    #[test]
    fn leaving_the_fetched_window_requests_a_new_fetch() {
        let mut app = app_in(2024, 2);
        let request = app.request_fetch();
        app.apply_fetch(outcome(request, vec![]));
        let window = request.window;

        let mut refetch = None;
        for _ in 0..24 {
            if let Some(r) = app.next_month() {
                refetch = Some(r);
                break;
            }
        }
        let refetch = refetch.expect("navigation eventually leaves the window");
        assert!(refetch.generation > request.generation);
        assert!(!window.covers(&app.month));
        assert!(refetch.window.covers(&app.month));
    }

    #[test]
    fn returning_while_a_fetch_is_pending_refetches_the_shown_month() {
        let mut app = app_in(2024, 2);
        let first = app.request_fetch();
        app.apply_fetch(outcome(first, vec![]));
        let feb = app.month;

        // Out to July, which leaves the loaded window.
        let mut pending: Vec<FetchRequest> = (0..5).filter_map(|_| app.next_month()).collect();
        assert_eq!(pending.len(), 1);

        // Back to February before the July fetch lands.
        pending.extend((0..5).filter_map(|_| app.prev_month()));
        assert_eq!(app.month, feb);
        assert!(pending.len() > 1);

        for request in pending {
            app.apply_fetch(outcome(request, vec![]));
        }
        assert_eq!(app.load_state, LoadState::Ready);
        assert!(app.fetched_window.is_some_and(|w| w.covers(&feb)));
    }

    #[test]
    fn day_bookings_and_detail() {
        let mut app = app_in(2024, 2);
        let request = app.request_fetch();
        app.apply_fetch(outcome(
            request,
            vec![
                NormalizedBooking::new("leaving", date(2024, 2, 8), date(2024, 2, 10)),
                NormalizedBooking::new("arriving", date(2024, 2, 10), date(2024, 2, 13)),
                NormalizedBooking::new("broken", date(2024, 2, 10), date(2024, 2, 10)),
            ],
        ));
        app.selected_date = date(2024, 2, 10);

        let ids: Vec<_> = app.day_bookings().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["leaving", "arriving"]);

        app.cursor_down();
        app.show_detail();
        assert_eq!(app.detail_booking().map(|b| b.id.as_str()), Some("arriving"));
        app.close_detail();
        assert!(app.detail_booking().is_none());

        app.selected_date = date(2024, 2, 20);
        app.show_detail();
        assert!(app.detail.is_none());
        assert!(app.status_message.is_some());
    }
}
