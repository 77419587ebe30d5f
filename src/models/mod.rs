pub mod candidate;
pub mod coordinates;
pub mod geo;
pub mod request;
pub mod route;
pub mod sector;

pub use candidate::{Candidate, RoutePriority};
pub use coordinates::Coordinates;
pub use geo::BoundingBox;
pub use request::{RoundTripQuery, RoundTripRequest};
pub use route::{
    LoopRoute, RoundTripResponse, RouteCandidate, SectorFailure, SectorOutcome, Segment,
};
pub use sector::{Sector, SectorMap};
