//! Request and icon URL construction.

use reqwest::Url;

use crate::{
    config::{Config, Units, parse_http_url},
    error::ConfigError,
    model::Coordinates,
};

/// Builds provider URLs from a validated [`Config`].
#[derive(Debug, Clone)]
pub struct ApiUrlBuilder {
    base_url: Url,
    icon_base_url: Url,
    api_key: String,
    units: Units,
    language: String,
}

impl ApiUrlBuilder {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let api_key = config.api_key().ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            base_url: parse_http_url("base_url", &config.base_url)?,
            icon_base_url: parse_http_url("icon_base_url", &config.icon_base_url)?,
            api_key: api_key.to_string(),
            units: config.units,
            language: config.language.trim().to_string(),
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// `<base>?lat=..&lon=..&appid=..&units=..&lang=..`, percent-encoded.
    pub fn build_weather_url(&self, coords: Coordinates) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude().to_string())
            .append_pair("lon", &coords.longitude().to_string())
            .append_pair("appid", &self.api_key)
            .append_pair("units", self.units.as_str())
            .append_pair("lang", &self.language);
        url
    }

    /// Same as [`build_weather_url`](Self::build_weather_url) with the key masked, for logs.
    pub fn redacted_weather_url(&self, coords: Coordinates) -> String {
        let url = self.build_weather_url(coords);
        let mut redacted = url.clone();
        redacted
            .query_pairs_mut()
            .clear()
            .extend_pairs(url.query_pairs().map(|(k, v)| {
                let v = if k == "appid" { "***".into() } else { v };
                (k, v)
            }));
        redacted.to_string()
    }

    /// `<icon-base>/<code>.png`. The code is not checked; a bad one yields a 404 later.
    pub fn build_icon_url(&self, icon_code: &str) -> String {
        let mut url = self.icon_base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&format!("{icon_code}.png"));
        }
        url.to_string()
    }
}
