//! Position lookup for the emergency request form

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GeoConfig;
use crate::notification::{Notification, Notifier};

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::PositionUnavailable(format!(
                "coordinates out of range: {}, {}",
                latitude, longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocationError {
    #[error("Geolocation is not supported by this host")]
    Unsupported,

    #[error("Permission to read the position was denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Host environment capable of reporting the current position
#[async_trait]
pub trait Locator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Locator backed by the coordinates given in the configuration
#[derive(Debug, Clone)]
pub struct ConfiguredLocator {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl ConfiguredLocator {
    pub fn new(config: &GeoConfig) -> Self {
        Self {
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }
}

#[async_trait]
impl Locator for ConfiguredLocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude),
            (None, None) => Err(LocationError::Unsupported),
            _ => Err(LocationError::PositionUnavailable(
                "only one of latitude/longitude is configured".to_string(),
            )),
        }
    }
}

/// Ask `locator` for the position once and report the result through `notifier`.
///
/// Returns the formatted location on success; on failure the caller keeps
/// whatever the user typed.
pub async fn detect_location<L, N>(locator: &L, notifier: &mut N) -> Option<String>
where
    L: Locator + ?Sized,
    N: Notifier + ?Sized,
{
    match locator.current_position().await {
        Ok(coordinates) => {
            info!("location detected: {}", coordinates);
            notifier.notify(Notification::new(
                "Location Retrieved",
                "Your current location has been detected automatically.",
            ));
            Some(coordinates.to_string())
        }
        Err(LocationError::Unsupported) => {
            warn!("geolocation unsupported on this host");
            notifier.notify(
                Notification::new("Geolocation not supported", "Please enter your location manually.")
                    .destructive(),
            );
            None
        }
        Err(err) => {
            warn!("geolocation failed: {}", err);
            notifier.notify(
                Notification::new("Location Error", "Please enter your location manually.").destructive(),
            );
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Locator returning a canned answer
    pub struct StaticLocator(pub Result<Coordinates, LocationError>);

    #[async_trait]
    impl Locator for StaticLocator {
        async fn current_position(&self) -> Result<Coordinates, LocationError> {
            self.0.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StaticLocator;
    use super::*;

    #[test]
    fn test_coordinates_format_with_six_decimals() {
        let c = Coordinates::new(40.7127753, -74.0059728).unwrap();
        assert_eq!(c.to_string(), "40.712775, -74.005973");
        assert_eq!(Coordinates::new(1.5, 2.0).unwrap().to_string(), "1.500000, 2.000000");
    }

    #[test]
    fn test_out_of_range_coordinates_are_unavailable() {
        assert!(matches!(
            Coordinates::new(91.0, 0.0),
            Err(LocationError::PositionUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_detect_location_success() {
        let locator = StaticLocator(Coordinates::new(51.5, -0.12));
        let mut notes: Vec<Notification> = Vec::new();
        let location = detect_location(&locator, &mut notes).await;
        assert_eq!(location.as_deref(), Some("51.500000, -0.120000"));
        assert_eq!(notes[0].title, "Location Retrieved");
        assert!(!notes[0].destructive);
    }

    #[tokio::test]
    async fn test_unconfigured_host_is_unsupported() {
        let locator = ConfiguredLocator::new(&GeoConfig::default());
        let mut notes: Vec<Notification> = Vec::new();
        assert_eq!(detect_location(&locator, &mut notes).await, None);
        assert_eq!(notes[0].title, "Geolocation not supported");
        assert!(notes[0].destructive);
    }

    #[tokio::test]
    async fn test_failed_lookup_reports_location_error() {
        let locator = StaticLocator(Err(LocationError::PermissionDenied));
        let mut notes: Vec<Notification> = Vec::new();
        assert_eq!(detect_location(&locator, &mut notes).await, None);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Location Error");
        assert_eq!(notes[0].description, "Please enter your location manually.");
    }

    #[tokio::test]
    async fn test_half_configured_locator_is_unavailable() {
        let locator = ConfiguredLocator::new(&GeoConfig {
            latitude: Some(10.0),
            longitude: None,
        });
        assert!(matches!(
            locator.current_position().await,
            Err(LocationError::PositionUnavailable(_))
        ));
    }
}
