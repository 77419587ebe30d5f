use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compass quadrant around the start point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "NW")]
    NorthWest,
}

impl Sector {
    /// Processing order; also the tie-break order for equally good routes.
    pub const ALL: [Sector; 4] = [
        Sector::NorthEast,
        Sector::SouthEast,
        Sector::SouthWest,
        Sector::NorthWest,
    ];

    /// Classify `point` relative to `center`. Equal coordinates fall to the
    /// south/west side.
    pub fn classify(center: &Coordinates, point: &Coordinates) -> Sector {
        let east = point.lng > center.lng;
        let north = point.lat > center.lat;
        match (east, north) {
            (true, true) => Sector::NorthEast,
            (true, false) => Sector::SouthEast,
            (false, false) => Sector::SouthWest,
            (false, true) => Sector::NorthWest,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Sector::NorthEast => "NE",
            Sector::SouthEast => "SE",
            Sector::SouthWest => "SW",
            Sector::NorthWest => "NW",
        }
    }

    fn index(self) -> usize {
        match self {
            Sector::NorthEast => 0,
            Sector::SouthEast => 1,
            Sector::SouthWest => 2,
            Sector::NorthWest => 3,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One optional slot per sector.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorMap<T> {
    slots: [Option<T>; 4],
}

impl<T> Default for SectorMap<T> {
    fn default() -> Self {
        SectorMap {
            slots: [None, None, None, None],
        }
    }
}

impl<T> SectorMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, sector: Sector) -> Option<&T> {
        self.slots[sector.index()].as_ref()
    }

    pub fn insert(&mut self, sector: Sector, value: T) -> Option<T> {
        self.slots[sector.index()].replace(value)
    }

    /// Filled slots in [`Sector::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Sector, &T)> {
        Sector::ALL
            .into_iter()
            .filter_map(move |sector| self.get(sector).map(|value| (sector, value)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn all(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.slots
            .iter()
            .all(|slot| slot.as_ref().is_some_and(&predicate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinates {
        Coordinates::new(lat, lng).unwrap()
    }

    #[test]
    fn test_classify_quadrants() {
        let center = c(60.0, 25.0);
        assert_eq!(Sector::classify(&center, &c(60.1, 25.1)), Sector::NorthEast);
        assert_eq!(Sector::classify(&center, &c(59.9, 25.1)), Sector::SouthEast);
        assert_eq!(Sector::classify(&center, &c(59.9, 24.9)), Sector::SouthWest);
        assert_eq!(Sector::classify(&center, &c(60.1, 24.9)), Sector::NorthWest);
    }

    #[test]
    fn test_classify_ties_go_south_west() {
        let center = c(60.0, 25.0);
        // equal longitude is "west", equal latitude is "south"
        assert_eq!(Sector::classify(&center, &c(60.1, 25.0)), Sector::NorthWest);
        assert_eq!(Sector::classify(&center, &c(60.0, 25.1)), Sector::SouthEast);
        assert_eq!(Sector::classify(&center, &center), Sector::SouthWest);
    }

    #[test]
    fn test_classify_partitions_grid() {
        let center = c(60.0, 25.0);
        for dlat in [-0.2, -0.1, 0.0, 0.1, 0.2] {
            for dlng in [-0.2, -0.1, 0.0, 0.1, 0.2] {
                let point = c(60.0 + dlat, 25.0 + dlng);
                let matches = [
                    point.lng > center.lng && point.lat > center.lat,
                    point.lng > center.lng && point.lat <= center.lat,
                    point.lng <= center.lng && point.lat <= center.lat,
                    point.lng <= center.lng && point.lat > center.lat,
                ];
                assert_eq!(matches.iter().filter(|m| **m).count(), 1);
                let expected = Sector::ALL[matches.iter().position(|m| *m).unwrap()];
                assert_eq!(Sector::classify(&center, &point), expected);
            }
        }
    }

    #[test]
    fn test_sector_serializes_as_code() {
        assert_eq!(
            serde_json::to_value(Sector::SouthWest).unwrap(),
            serde_json::json!("SW")
        );
        assert_eq!(Sector::NorthEast.to_string(), "NE");
    }

    #[test]
    fn test_sector_map() {
        let mut map = SectorMap::new();
        assert!(map.is_empty());
        assert!(!map.all(|_: &u8| true));

        map.insert(Sector::NorthWest, 1u8);
        map.insert(Sector::NorthEast, 2u8);
        let order: Vec<_> = map.iter().map(|(sector, _)| sector).collect();
        assert_eq!(order, vec![Sector::NorthEast, Sector::NorthWest]);

        assert_eq!(map.insert(Sector::NorthEast, 3), Some(2));
        map.insert(Sector::SouthEast, 3);
        map.insert(Sector::SouthWest, 3);
        assert_eq!(map.len(), 4);
        assert!(!map.all(|v| *v == 3));
        map.insert(Sector::NorthWest, 3);
        assert!(map.all(|v| *v == 3));
    }
}
