use crate::constants::EARTH_RADIUS_M;
use crate::models::Coordinates;
use geo::Rect;

/// Move `start` by a planar offset in meters (north and east positive).
///
/// Flat-earth approximation; accurate enough for the few-kilometre boxes
/// used to bound engine queries. The result is not clamped to valid ranges.
pub fn destination_by_offset(start: &Coordinates, north_m: f64, east_m: f64) -> Coordinates {
    let delta_lat = north_m / EARTH_RADIUS_M;
    let delta_lng = east_m / (EARTH_RADIUS_M * start.lat.to_radians().cos());

    Coordinates {
        lat: start.lat + delta_lat.to_degrees(),
        lng: start.lng + delta_lng.to_degrees(),
    }
}

/// Axis-aligned bounding box in geographic coordinates (x = lng, y = lat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox(Rect<f64>);

impl BoundingBox {
    pub fn new(a: Coordinates, b: Coordinates) -> Self {
        BoundingBox(Rect::new(a, b))
    }

    /// Box reaching `half_extent_m` meters north/east and south/west of `center`.
    pub fn around(center: &Coordinates, half_extent_m: f64) -> Self {
        let high = destination_by_offset(center, half_extent_m, half_extent_m);
        let low = destination_by_offset(center, -half_extent_m, -half_extent_m);
        BoundingBox::new(high, low)
    }

    pub fn min_lat(&self) -> f64 {
        self.0.min().y
    }

    pub fn max_lat(&self) -> f64 {
        self.0.max().y
    }

    pub fn min_lng(&self) -> f64 {
        self.0.min().x
    }

    pub fn max_lng(&self) -> f64 {
        self.0.max().x
    }
}
