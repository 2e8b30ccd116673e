//! Monthly calendar of Hostex bookings.
//!
//! [`layout`] holds the pure grid and bar-placement core; [`booking`] feeds
//! it and [`render`] / [`components`] draw its output.

pub mod app;
pub mod booking;
pub mod cli;
pub mod components;
pub mod config;
pub mod event;
pub mod layout;
pub mod render;
pub mod theme;
pub mod tui;
