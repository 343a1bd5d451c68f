//! Common types used across the service

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::validation::{validate_latitude, validate_longitude};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whole-degree cell containing this point, as queried from the
    /// tidal current area API.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::enclosing(self.latitude, self.longitude)
    }
}

impl Validate for GpsCoordinates {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_latitude(self.latitude) {
            errors.add("latitude", e);
        }
        if let Err(e) = validate_longitude(self.longitude) {
            errors.add("longitude", e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Integer-degree bounding box.
///
/// When a coordinate is already a whole number the box collapses to a
/// single line (`min == max`); the upstream API accepts that as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: i32,
    pub max_lat: i32,
    pub min_lon: i32,
    pub max_lon: i32,
}

impl BoundingBox {
    pub fn enclosing(latitude: f64, longitude: f64) -> Self {
        Self {
            min_lat: latitude.floor() as i32,
            max_lat: latitude.ceil() as i32,
            min_lon: longitude.floor() as i32,
            max_lon: longitude.ceil() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_fractional() {
        let bbox = GpsCoordinates::new(36.5, 124.3).bounding_box();
        assert_eq!(
            bbox,
            BoundingBox {
                min_lat: 36,
                max_lat: 37,
                min_lon: 124,
                max_lon: 125,
            }
        );
    }

    #[test]
    fn test_bounding_box_integer_collapses() {
        let bbox = BoundingBox::enclosing(33.0, 126.0);
        assert_eq!(bbox.min_lat, bbox.max_lat);
        assert_eq!(bbox.min_lon, bbox.max_lon);
        assert_eq!(bbox.min_lat, 33);
        assert_eq!(bbox.min_lon, 126);
    }

    #[test]
    fn test_bounding_box_negative() {
        let bbox = BoundingBox::enclosing(-12.25, -77.5);
        assert_eq!(bbox.min_lat, -13);
        assert_eq!(bbox.max_lat, -12);
        assert_eq!(bbox.min_lon, -78);
        assert_eq!(bbox.max_lon, -77);
    }

    #[test]
    fn test_coordinates_validation() {
        assert!(GpsCoordinates::new(33.45, 126.57).validate().is_ok());
        assert!(GpsCoordinates::new(90.0, -180.0).validate().is_ok());
        assert!(GpsCoordinates::new(90.5, 126.57).validate().is_err());
        assert!(GpsCoordinates::new(33.45, 181.0).validate().is_err());
    }
}
