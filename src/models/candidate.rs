use crate::config::RoundTripConfig;
use crate::models::Coordinates;

/// A turnaround node picked for one sector.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub coordinates: Coordinates,
    pub node_id: i64,
    pub distance_from_center_m: f64,
    /// Road class, already normalized through [`RoutePriority::normalize`]
    pub way_type: i32,
}

/// Ordered road classes, most preferred first. The last entry is always the
/// catch-all class.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePriority {
    classes: Vec<i32>,
}

impl RoutePriority {
    pub fn new(preferred: &[i32], other: i32) -> Self {
        let mut classes: Vec<i32> = Vec::with_capacity(preferred.len() + 1);
        for class in preferred {
            if *class != other && !classes.contains(class) {
                classes.push(*class);
            }
        }
        classes.push(other);
        RoutePriority { classes }
    }

    pub fn from_config(config: &RoundTripConfig) -> Self {
        Self::new(&config.way_priority, config.other_way_type)
    }

    pub fn other(&self) -> i32 {
        self.classes[self.classes.len() - 1]
    }

    pub fn best(&self) -> i32 {
        self.classes[0]
    }

    /// Map unknown or missing classes to the catch-all class.
    pub fn normalize(&self, way_type: Option<i32>) -> i32 {
        match way_type {
            Some(class) if self.classes.contains(&class) => class,
            _ => self.other(),
        }
    }

    /// Lower is better. Unknown classes rank with the catch-all.
    pub fn rank(&self, way_type: i32) -> usize {
        self.classes
            .iter()
            .position(|class| *class == way_type)
            .unwrap_or(self.classes.len() - 1)
    }

    pub fn is_strictly_better(&self, challenger: i32, incumbent: i32) -> bool {
        self.rank(challenger) < self.rank(incumbent)
    }
}

impl Default for RoutePriority {
    fn default() -> Self {
        Self::from_config(&RoundTripConfig::default())
    }
}
