use crate::models::Coordinates;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Unsigned decimal, e.g. "1", "12.3". Negative coordinates are not accepted.
static DECIMAL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn decimal_pattern() -> &'static Regex {
    DECIMAL_PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("decimal regex must compile"))
}

/// Raw query string of `GET /roundtrip`. Both parameters are kept as text so
/// that every malformed value gets a descriptive 400 instead of an extractor
/// rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundTripQuery {
    pub start_coordinates: Option<String>,
    pub distance_km: Option<String>,
}

/// A validated round-trip request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTripRequest {
    pub start: Coordinates,
    pub distance_km: f64,
}

impl RoundTripRequest {
    pub fn distance_m(&self) -> f64 {
        self.distance_km * 1000.0
    }
}

impl RoundTripQuery {
    pub fn validate(&self) -> Result<RoundTripRequest, String> {
        let start = match self.start_coordinates.as_deref() {
            Some(raw) if raw.contains(',') => raw,
            _ => {
                return Err(
                    r#"Invalid GET param "start_coordinates". Should be "lat,lon" (without quotes)."#
                        .to_string(),
                )
            }
        };

        let parts: Vec<&str> = start.split(',').collect();
        if parts.len() != 2 {
            return Err(
                r#"Invalid coordinate(s) in GET param "start_coordinates". Provide both "lat,lon""#
                    .to_string(),
            );
        }
        if !parts.iter().all(|part| decimal_pattern().is_match(part)) {
            return Err(
                r#"Invalid coordinate(s) in GET param "start_coordinates". Format: "nn.mm,nn.mm""#
                    .to_string(),
            );
        }

        let distance = self
            .distance_km
            .as_deref()
            .ok_or_else(|| r#"Invalid GET param "distance_km"."#.to_string())?;
        let distance_error = || r#"Invalid GET param "distance_km" e.g. "1", "12.3", "99""#.to_string();
        if !decimal_pattern().is_match(distance) {
            return Err(distance_error());
        }

        let lat: f64 = parts[0]
            .parse()
            .map_err(|_| format!("Invalid latitude: {}", parts[0]))?;
        let lng: f64 = parts[1]
            .parse()
            .map_err(|_| format!("Invalid longitude: {}", parts[1]))?;
        // Long digit strings match the pattern but overflow to infinity
        let distance_km: f64 = distance.parse().map_err(|_| distance_error())?;
        if !distance_km.is_finite() {
            return Err(distance_error());
        }

        Ok(RoundTripRequest {
            start: Coordinates::new(lat, lng)?,
            distance_km,
        })
    }
}
