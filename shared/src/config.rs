use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

use crate::geo::{Coordinate, CoordinateError, Region, SearchRadius, Viewport};
use crate::{
    CAMERA_ANIMATION_MS, DEFAULT_API_BASE_URL, DEFAULT_LATITUDE_DELTA, INITIAL_LATITUDE,
    INITIAL_LONGITUDE,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(String),
    #[error("invalid api_base_url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid initial_center: {0}")]
    InvalidCenter(#[from] CoordinateError),
    #[error("latitude_delta must be a positive finite number, got {0}")]
    InvalidLatitudeDelta(f64),
}

/// Shell-supplied settings. Every field has a built-in default, so a shell
/// may send `{}` or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub initial_center: Coordinate,
    pub latitude_delta: f64,
    #[serde(deserialize_with = "snap_radius")]
    pub default_radius_m: SearchRadius,
    pub camera_animation_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            initial_center: Coordinate::unchecked(INITIAL_LATITUDE, INITIAL_LONGITUDE),
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            default_radius_m: SearchRadius::default(),
            camera_animation_ms: CAMERA_ANIMATION_MS,
        }
    }
}

/// Off-step radii from the shell are snapped onto the slider grid.
fn snap_radius<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SearchRadius, D::Error> {
    f64::deserialize(deserializer).map(SearchRadius::snap)
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.api_base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.api_base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: self.api_base_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        Coordinate::new(self.initial_center.latitude, self.initial_center.longitude)?;

        if !self.latitude_delta.is_finite() || self.latitude_delta <= 0.0 {
            return Err(ConfigError::InvalidLatitudeDelta(self.latitude_delta));
        }

        Ok(())
    }

    /// URL of the bounty collection endpoint.
    #[must_use]
    pub fn bounties_url(&self) -> String {
        format!("{}/bounties", self.api_base_url.trim_end_matches('/'))
    }

    #[must_use]
    pub fn initial_region(&self, viewport: Viewport) -> Region {
        Region::initial(self.initial_center, self.latitude_delta, viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AppConfig::from_json(
            r#"{"api_base_url":"https://api.example.com/v1/","default_radius_m":500}"#,
        )
        .unwrap();
        assert_eq!(config.default_radius_m.meters(), 500);
        assert_eq!(config.bounties_url(), "https://api.example.com/v1/bounties");
        assert_eq!(config.camera_animation_ms, CAMERA_ANIMATION_MS);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_json(r#"{"api_base_url":"ftp://example.com"}"#),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"initial_center":{"latitude":95.0,"longitude":0.0}}"#),
            Err(ConfigError::InvalidCenter(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"latitude_delta":0.0}"#),
            Err(ConfigError::InvalidLatitudeDelta(_))
        ));
        assert!(matches!(AppConfig::from_json("nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_off_step_radius_is_snapped() {
        let config = AppConfig::from_json(r#"{"default_radius_m":250}"#).unwrap();
        assert_eq!(config.default_radius_m.meters(), 300);

        let config = AppConfig::from_json(r#"{"default_radius_m":5000}"#).unwrap();
        assert_eq!(config.default_radius_m.meters(), 2000);

        assert!(matches!(
            AppConfig::from_json(r#"{"default_radius_m":"wide"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_initial_region_uses_viewport() {
        let region = AppConfig::default().initial_region(Viewport::new(400.0, 800.0));
        assert_eq!(region.latitude_delta, DEFAULT_LATITUDE_DELTA);
        assert!((region.longitude_delta - DEFAULT_LATITUDE_DELTA / 2.0).abs() < 1e-12);
    }
}
