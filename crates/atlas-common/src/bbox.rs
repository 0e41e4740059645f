//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (WGS84).
///
/// `x` is longitude and `y` is latitude. Boxes crossing the antimeridian are
/// not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// The whole globe.
    pub const WORLD: BoundingBox = BoundingBox {
        min_x: -180.0,
        min_y: -90.0,
        max_x: 180.0,
        max_y: 90.0,
    };

    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a "minlon,minlat,maxlon,maxlat" string.
    pub fn parse(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let num = |p: &str| -> Result<f64, BboxParseError> {
            p.parse()
                .map_err(|_| BboxParseError::InvalidNumber(p.to_string()))
        };

        let bbox = Self {
            min_x: num(parts[0])?,
            min_y: num(parts[1])?,
            max_x: num(parts[2])?,
            max_y: num(parts[3])?,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check the box is ordered and lies within geographic limits.
    pub fn validate(&self) -> Result<(), BboxParseError> {
        let finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.min_x > self.max_x || self.min_y > self.max_y {
            return Err(BboxParseError::Inverted(self.to_string()));
        }
        if self.min_x < -180.0 || self.max_x > 180.0 || self.min_y < -90.0 || self.max_y > 90.0 {
            return Err(BboxParseError::OutsideWorld(self.to_string()));
        }
        Ok(())
    }

    /// Center as (lat, lon).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_y + self.max_y) / 2.0,
            (self.min_x + self.max_x) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox (edges included).
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_x && lon <= self.max_x && lat >= self.min_y && lat <= self.max_y
    }

    /// Leaflet-style bounds: [[south, west], [north, east]].
    pub fn to_lat_lon_corners(&self) -> [[f64; 2]; 2] {
        [[self.min_y, self.min_x], [self.max_y, self.max_x]]
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::WORLD
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bounding box format: {0}. Expected 'minlon,minlat,maxlon,maxlat'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),

    #[error("Bounding box minimum exceeds maximum: {0}")]
    Inverted(String),

    #[error("Bounding box exceeds geographic limits: {0}")]
    OutsideWorld(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox = BoundingBox::parse("124.0,33.0,132.0,39.0").unwrap();
        assert_eq!(bbox.min_x, 124.0);
        assert_eq!(bbox.min_y, 33.0);
        assert_eq!(bbox.max_x, 132.0);
        assert_eq!(bbox.max_y, 39.0);
    }

    #[test]
    fn test_center_is_lat_lon() {
        let bbox = BoundingBox::new(124.0, 33.0, 132.0, 39.0);
        assert_eq!(bbox.center(), (36.0, 128.0));
    }
}
