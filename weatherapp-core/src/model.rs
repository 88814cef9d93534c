use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A point on the globe, validated to lie within the usual ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ConfigError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ConfigError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// One weather response: current conditions plus hourly and daily forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Shift in seconds from UTC for the requested location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_offset: Option<i32>,

    pub current: Current,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hourly: Vec<Hourly>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub daily: Vec<Daily>,
}

impl WeatherInfo {
    /// Local offset of the location, UTC if the provider did not say.
    pub fn offset(&self) -> FixedOffset {
        self.timezone_offset
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

/// A named weather state and its icon code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Shared accessors over the `weather` list, which may legitimately be empty.
pub trait Conditions {
    fn conditions(&self) -> &[WeatherCondition];

    fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.conditions().first()
    }

    fn condition_main(&self) -> Option<&str> {
        self.primary_condition().and_then(|c| c.main.as_deref())
    }

    fn condition_icon(&self) -> Option<&str> {
        self.primary_condition().and_then(|c| c.icon.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub dt: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_deg: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weather: Vec<WeatherCondition>,
}

impl Conditions for Current {
    fn conditions(&self) -> &[WeatherCondition] {
        &self.weather
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hourly {
    pub dt: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_deg: Option<i64>,
    /// Probability of precipitation, 0.0 to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weather: Vec<WeatherCondition>,
}

impl Conditions for Hourly {
    fn conditions(&self) -> &[WeatherCondition] {
        &self.weather
    }
}

/// Daily temperatures broken down by part of day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eve: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morn: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyFeelsLike {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eve: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morn: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Daily {
    pub dt: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<DailyTemperature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<DailyFeelsLike>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uvi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_deg: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pop: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weather: Vec<WeatherCondition>,
}

impl Conditions for Daily {
    fn conditions(&self) -> &[WeatherCondition] {
        &self.weather
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_accept_valid_ranges() {
        assert!(Coordinates::new(0.0, 0.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(23.8103, 90.4125).is_ok());
    }

    #[test]
    fn coordinates_reject_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(-91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 181.0).is_err());
        assert!(Coordinates::new(0.0, -181.0).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn conditions_tolerate_empty_list() {
        let current = Current {
            dt: 1000,
            sunrise: None,
            sunset: None,
            temp: None,
            feels_like: None,
            pressure: None,
            humidity: None,
            dew_point: None,
            uvi: None,
            clouds: None,
            visibility: None,
            wind_speed: None,
            wind_deg: None,
            weather: Vec::new(),
        };

        assert!(current.primary_condition().is_none());
        assert_eq!(current.condition_main(), None);
        assert_eq!(current.condition_icon(), None);
    }

    #[test]
    fn first_condition_is_primary() {
        let hourly = Hourly {
            dt: 1000,
            temp: Some(20.0),
            feels_like: None,
            pressure: None,
            humidity: None,
            dew_point: None,
            uvi: None,
            clouds: None,
            visibility: None,
            wind_speed: None,
            wind_deg: None,
            pop: None,
            weather: vec![
                WeatherCondition {
                    main: Some("Rain".into()),
                    icon: Some("10d".into()),
                    ..Default::default()
                },
                WeatherCondition {
                    main: Some("Mist".into()),
                    icon: Some("50d".into()),
                    ..Default::default()
                },
            ],
        };

        assert_eq!(hourly.condition_main(), Some("Rain"));
        assert_eq!(hourly.condition_icon(), Some("10d"));
    }
}
