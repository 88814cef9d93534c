//! Plain-text layout of a `WeatherView`.

use std::fmt::Write;

use chrono::Local;
use weatherapp_core::{DailyView, HourlyView, WeatherView};

#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub hours: usize,
    pub days: usize,
}

const MISSING: &str = "--";

fn or_missing(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(MISSING)
}

pub fn render(view: &WeatherView, limits: Limits) -> String {
    let mut out = String::new();
    let current = &view.current;

    let _ = writeln!(out, "Updated {}", Local::now().format("%H:%M:%S"));
    if let Some(date) = &current.date {
        let _ = writeln!(out, "{date}");
    }
    if let Some(tz) = &view.timezone {
        let _ = writeln!(out, "{tz}");
    }
    let _ = writeln!(out);

    let headline = [current.temperature.as_deref(), current.condition.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("  ");
    if !headline.is_empty() {
        let _ = writeln!(out, "  {headline}");
    }
    if let Some(feels_like) = &current.feels_like {
        let _ = writeln!(out, "  Feels like {feels_like}");
    }
    if let Some(icon) = &current.icon_url {
        let _ = writeln!(out, "  Icon {icon}");
    }

    let rows = [
        ("Sunrise", &current.sunrise),
        ("Sunset", &current.sunset),
        ("Wind", &current.wind_speed),
        ("Humidity", &current.humidity),
        ("UV index", &current.uv_index),
        ("Pressure", &current.pressure),
        ("Visibility", &current.visibility),
        ("Dew point", &current.dew_point),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            let _ = writeln!(out, "  {label:<11}{value}");
        }
    }

    if limits.hours > 0 && !view.hourly.is_empty() {
        let _ = writeln!(out, "\nHourly");
        for hour in view.hourly.iter().take(limits.hours) {
            let _ = writeln!(out, "  {}", hourly_line(hour));
        }
    }

    if limits.days > 0 && !view.daily.is_empty() {
        let _ = writeln!(out, "\nDaily");
        for day in view.daily.iter().take(limits.days) {
            let _ = writeln!(out, "  {}", daily_line(day));
        }
    }

    out
}

fn hourly_line(hour: &HourlyView) -> String {
    format!(
        "{:<6} {:>6} {:>5}  {}",
        or_missing(&hour.time),
        or_missing(&hour.temperature),
        or_missing(&hour.precipitation),
        or_missing(&hour.condition),
    )
}

fn daily_line(day: &DailyView) -> String {
    format!(
        "{:<7} {:>6} / {:<6} {:>5}  {}",
        or_missing(&day.label),
        or_missing(&day.min),
        or_missing(&day.max),
        or_missing(&day.precipitation),
        or_missing(&day.condition),
    )
}
