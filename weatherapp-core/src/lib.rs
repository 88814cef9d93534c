//! Core library for the `weatherapp` home screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Request URL construction and the HTTP client
//! - Parsing of provider documents into a typed domain model
//! - Display formatting and the observable store the UI reads from
//!
//! It is used by `weatherapp-cli`, but can also be reused by other front ends.
//!
//! Data flow: coordinates -> [`ApiUrlBuilder`] -> [`WeatherClient`] ->
//! [`parser::parse`] -> [`WeatherInfoStore`] -> subscribers, which turn the
//! model into strings with [`format`] or [`WeatherView`].

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod model;
pub mod parser;
pub mod session;
pub mod store;
pub mod url;

pub use client::{FetchResult, WeatherClient, WeatherProvider};
pub use config::{Config, Units};
pub use display::{CurrentView, DailyView, HourlyView, WeatherView};
pub use error::{ConfigError, FetchError, FetchErrorKind, NetworkError, ParseError};
pub use model::{
    Conditions, Coordinates, Current, Daily, DailyFeelsLike, DailyTemperature, Hourly,
    WeatherCondition, WeatherInfo,
};
pub use session::WeatherSession;
pub use store::{Subscription, WeatherInfoStore};
pub use url::ApiUrlBuilder;
