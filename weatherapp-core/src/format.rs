//! Display formatting for raw provider values.
//!
//! Every function is total: an absent or unrepresentable input gives `None`.
//!
//! The provider reports pressure in hPa and visibility in metres regardless of
//! the requested unit system, so neither conversion depends on [`Units`].

use chrono::{DateTime, FixedOffset};

use crate::config::Units;

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%d %b";
const FULL_DATE_FORMAT: &str = "%A, %d %B %Y";

fn localize(epoch_secs: i64, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(epoch_secs, 0).map(|utc| utc.with_timezone(&offset))
}

/// `14:05`
pub fn epoch_to_time(epoch_secs: i64, offset: FixedOffset) -> Option<String> {
    localize(epoch_secs, offset).map(|dt| dt.format(TIME_FORMAT).to_string())
}

/// `15 Jan`
pub fn epoch_to_date(epoch_secs: i64, offset: FixedOffset) -> Option<String> {
    localize(epoch_secs, offset).map(|dt| dt.format(DATE_FORMAT).to_string())
}

/// `Monday, 15 January 2024`
pub fn epoch_to_full_date(epoch_secs: i64, offset: FixedOffset) -> Option<String> {
    localize(epoch_secs, offset).map(|dt| dt.format(FULL_DATE_FORMAT).to_string())
}

/// Nearest integer, ties toward positive infinity (`21.5 -> 22`, `-21.5 -> -21`).
pub fn round_temperature(value: Option<f64>) -> Option<String> {
    let value = value.filter(|v| v.is_finite())?;
    // `value + 0.5` would carry 0.49999999999999994 up to 1.
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    // Integer formatting so that -0.4 prints as "0", not "-0".
    Some((rounded as i64).to_string())
}

/// Rounded temperature followed by the unit symbol, e.g. `22℃`.
pub fn format_temperature(value: Option<f64>, units: Units) -> Option<String> {
    round_temperature(value).map(|t| format!("{t}{}", units.temperature_symbol()))
}

/// `1013 hPa`
pub fn format_pressure(hpa: Option<i64>) -> Option<String> {
    hpa.map(|p| format!("{p} hPa"))
}

/// Metres to kilometres with one decimal, e.g. `10000 -> 10.0 km`.
pub fn format_visibility(metres: Option<i64>) -> Option<String> {
    metres.map(|m| format!("{:.1} km", m as f64 / 1000.0))
}

/// `3.6 m/s` or `8.1 mph`
pub fn format_wind_speed(value: Option<f64>, units: Units) -> Option<String> {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{v:.1} {}", units.wind_speed_unit()))
}

/// `75%`
pub fn format_humidity(percent: Option<i64>) -> Option<String> {
    percent.map(|h| format!("{h}%"))
}

/// Probability of precipitation (0.0 to 1.0) as a whole percentage.
pub fn format_pop(probability: Option<f64>) -> Option<String> {
    probability
        .filter(|p| p.is_finite())
        .map(|p| format!("{}%", (p * 100.0).round() as i64))
}

/// UV index with one decimal.
pub fn format_uvi(uvi: Option<f64>) -> Option<String> {
    uvi.filter(|v| v.is_finite()).map(|v| format!("{v:.1}"))
}
