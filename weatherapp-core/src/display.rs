//! UI-ready strings for a `WeatherInfo`.
//!
//! A field is `None` when its source value is absent; the UI hides it.

use chrono::FixedOffset;

use crate::{
    config::Units,
    format,
    model::{Conditions, Current, Daily, Hourly, WeatherInfo},
    url::ApiUrlBuilder,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentView {
    pub date: Option<String>,
    pub time: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub temperature: Option<String>,
    pub feels_like: Option<String>,
    pub wind_speed: Option<String>,
    pub humidity: Option<String>,
    pub uv_index: Option<String>,
    pub pressure: Option<String>,
    pub visibility: Option<String>,
    pub dew_point: Option<String>,
}

impl CurrentView {
    pub fn new(current: &Current, urls: &ApiUrlBuilder, offset: FixedOffset) -> Self {
        let units = urls.units();
        let epoch = |secs: Option<i64>| secs.and_then(|s| format::epoch_to_time(s, offset));

        Self {
            date: format::epoch_to_full_date(current.dt, offset),
            time: format::epoch_to_time(current.dt, offset),
            sunrise: epoch(current.sunrise),
            sunset: epoch(current.sunset),
            condition: current.condition_main().map(str::to_string),
            description: current
                .primary_condition()
                .and_then(|c| c.description.clone()),
            icon_url: current.condition_icon().map(|icon| urls.build_icon_url(icon)),
            temperature: format::format_temperature(current.temp, units),
            feels_like: format::format_temperature(current.feels_like, units),
            wind_speed: format::format_wind_speed(current.wind_speed, units),
            humidity: format::format_humidity(current.humidity),
            uv_index: format::format_uvi(current.uvi),
            pressure: format::format_pressure(current.pressure),
            visibility: format::format_visibility(current.visibility),
            dew_point: format::format_temperature(current.dew_point, units),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HourlyView {
    pub time: Option<String>,
    pub temperature: Option<String>,
    pub condition: Option<String>,
    pub icon_url: Option<String>,
    pub precipitation: Option<String>,
}

impl HourlyView {
    pub fn new(hourly: &Hourly, urls: &ApiUrlBuilder, offset: FixedOffset) -> Self {
        Self {
            time: format::epoch_to_time(hourly.dt, offset),
            temperature: format::format_temperature(hourly.temp, urls.units()),
            condition: hourly.condition_main().map(str::to_string),
            icon_url: hourly.condition_icon().map(|icon| urls.build_icon_url(icon)),
            precipitation: format::format_pop(hourly.pop),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyView {
    /// Short label such as `15 Jan`, used for the day tabs.
    pub label: Option<String>,
    pub min: Option<String>,
    pub max: Option<String>,
    pub condition: Option<String>,
    pub icon_url: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub humidity: Option<String>,
    pub wind_speed: Option<String>,
    pub uv_index: Option<String>,
    pub precipitation: Option<String>,
}

impl DailyView {
    pub fn new(daily: &Daily, urls: &ApiUrlBuilder, offset: FixedOffset) -> Self {
        let units = urls.units();
        let temp = daily.temp.as_ref();
        let epoch = |secs: Option<i64>| secs.and_then(|s| format::epoch_to_time(s, offset));

        Self {
            label: format::epoch_to_date(daily.dt, offset),
            min: format::format_temperature(temp.and_then(|t| t.min), units),
            max: format::format_temperature(temp.and_then(|t| t.max), units),
            condition: daily.condition_main().map(str::to_string),
            icon_url: daily.condition_icon().map(|icon| urls.build_icon_url(icon)),
            sunrise: epoch(daily.sunrise),
            sunset: epoch(daily.sunset),
            humidity: format::format_humidity(daily.humidity),
            wind_speed: format::format_wind_speed(daily.wind_speed, units),
            uv_index: format::format_uvi(daily.uvi),
            precipitation: format::format_pop(daily.pop),
        }
    }
}

/// Everything the home screen shows, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherView {
    pub timezone: Option<String>,
    pub current: CurrentView,
    pub hourly: Vec<HourlyView>,
    pub daily: Vec<DailyView>,
}

impl WeatherView {
    pub fn new(info: &WeatherInfo, urls: &ApiUrlBuilder) -> Self {
        let offset = info.offset();
        Self {
            timezone: info.timezone.clone(),
            current: CurrentView::new(&info.current, urls, offset),
            hourly: info
                .hourly
                .iter()
                .map(|h| HourlyView::new(h, urls, offset))
                .collect(),
            daily: info
                .daily
                .iter()
                .map(|d| DailyView::new(d, urls, offset))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, parser::parse};

    fn urls(units: Units) -> ApiUrlBuilder {
        ApiUrlBuilder::new(&Config {
            units,
            ..Config::with_api_key("KEY")
        })
        .expect("valid config")
    }

    #[test]
    fn full_view() {
        let info = parse(
            r#"{
                "timezone": "Asia/Dhaka", "timezone_offset": 21600,
                "current": {
                    "dt": 1705320000, "sunrise": 1705279200, "sunset": 1705318200,
                    "temp": 21.6, "feels_like": 21.4, "pressure": 1015, "humidity": 64,
                    "dew_point": 14.5, "uvi": 0.0, "visibility": 3000, "wind_speed": 2.06,
                    "weather": [{"main": "Haze", "description": "haze", "icon": "50n"}]
                },
                "hourly": [{"dt": 1705323600, "temp": 20.2, "pop": 0.1,
                            "weather": [{"main": "Clear", "icon": "01n"}]}],
                "daily": [{"dt": 1705298400, "temp": {"min": 13.9, "max": 25.5},
                           "weather": [{"main": "Clear", "icon": "01d"}]}]
            }"#,
        )
        .expect("valid document");

        let view = WeatherView::new(&info, &urls(Units::Metric));

        assert_eq!(view.timezone.as_deref(), Some("Asia/Dhaka"));
        let current = &view.current;
        assert_eq!(current.date.as_deref(), Some("Monday, 15 January 2024"));
        assert_eq!(current.time.as_deref(), Some("18:00"));
        assert_eq!(current.sunrise.as_deref(), Some("06:40"));
        assert_eq!(current.sunset.as_deref(), Some("17:30"));
        assert_eq!(current.condition.as_deref(), Some("Haze"));
        assert_eq!(current.description.as_deref(), Some("haze"));
        assert_eq!(
            current.icon_url.as_deref(),
            Some("https://openweathermap.org/img/wn/50n.png")
        );
        assert_eq!(current.temperature.as_deref(), Some("22\u{2103}"));
        assert_eq!(current.feels_like.as_deref(), Some("21\u{2103}"));
        assert_eq!(current.wind_speed.as_deref(), Some("2.1 m/s"));
        assert_eq!(current.humidity.as_deref(), Some("64%"));
        assert_eq!(current.uv_index.as_deref(), Some("0.0"));
        assert_eq!(current.pressure.as_deref(), Some("1015 hPa"));
        assert_eq!(current.visibility.as_deref(), Some("3.0 km"));
        assert_eq!(current.dew_point.as_deref(), Some("15\u{2103}"));

        assert_eq!(view.hourly.len(), 1);
        assert_eq!(view.hourly[0].time.as_deref(), Some("19:00"));
        assert_eq!(view.hourly[0].temperature.as_deref(), Some("20\u{2103}"));
        assert_eq!(view.hourly[0].precipitation.as_deref(), Some("10%"));

        assert_eq!(view.daily.len(), 1);
        assert_eq!(view.daily[0].label.as_deref(), Some("15 Jan"));
        assert_eq!(view.daily[0].min.as_deref(), Some("14\u{2103}"));
        assert_eq!(view.daily[0].max.as_deref(), Some("26\u{2103}"));
        assert_eq!(
            view.daily[0].icon_url.as_deref(),
            Some("https://openweathermap.org/img/wn/01d.png")
        );
    }

    #[test]
    fn sparse_document_yields_absent_fields() {
        let info = parse(r#"{"current": {"dt": 1000, "weather": []}}"#).expect("valid document");
        let view = WeatherView::new(&info, &urls(Units::Imperial));

        assert!(view.current.date.is_some());
        assert_eq!(view.current.condition, None);
        assert_eq!(view.current.icon_url, None);
        assert_eq!(view.current.temperature, None);
        assert_eq!(view.current.pressure, None);
        assert_eq!(view.current.visibility, None);
        assert!(view.hourly.is_empty());
        assert!(view.daily.is_empty());
    }

    #[test]
    fn imperial_units_show_imperial_symbols() {
        let info = parse(r#"{"current": {"dt": 1000, "temp": 70.4, "wind_speed": 5.0}}"#)
            .expect("valid document");
        let view = WeatherView::new(&info, &urls(Units::Imperial));

        assert_eq!(view.current.temperature.as_deref(), Some("70\u{2109}"));
        assert_eq!(view.current.wind_speed.as_deref(), Some("5.0 mph"));
    }
}
