//! Stable application-wide constants.
//!
//! Values here are structural invariants, algorithm coefficients, and default
//! fallbacks for env-var-based configuration. They should rarely change.
//! For tuning knobs that benefit from runtime experimentation, see
//! [`RoundTripConfig`](crate::config::RoundTripConfig) instead.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Spatial engine defaults ---

/// osm2po-generated pgRouting edge table.
pub const DEFAULT_NETWORK_TABLE: &str = "fi_2po_4pgr";
/// Pool size for engine sessions.
pub const DEFAULT_ENGINE_MAX_CONNECTIONS: u32 = 10;
/// Deadline applied to every engine query. Overridden by `ENGINE_QUERY_TIMEOUT_MS`.
pub const DEFAULT_ENGINE_QUERY_TIMEOUT_MS: u64 = 15_000;
/// Seconds to wait for a free pooled connection.
pub const ENGINE_ACQUIRE_TIMEOUT_SECONDS: u64 = 5;

// --- Round-trip geometry ---

/// The loop is modelled as a square; this many edges make up its perimeter.
pub const LOOP_SQUARE_EDGES: f64 = 4.0;
/// Mean Earth radius (WGS84 semi-major axis) used for planar offsets.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

// --- Route synthesis defaults ---

/// Fraction by which the target distance may shrink or grow when searching
/// for turnaround candidates.
pub const DEFAULT_DISTANCE_MARGIN: f64 = 0.25;
/// Edges whose dispose value is strictly above this are excluded from the
/// alternate route search.
pub const DEFAULT_DISPOSE_THRESHOLD: f64 = 0.4;
/// Number of shortest paths requested per sector for the primary route set.
pub const DEFAULT_K_PATHS: u32 = 3;
/// Extra meters added around the extended search radius for the routing bbox.
pub const DEFAULT_ROUTING_BBOX_PADDING_M: f64 = 1_000.0;
/// Candidate search bbox half-size as a multiple of the max search radius.
pub const DEFAULT_CANDIDATE_BBOX_FACTOR: f64 = 2.0;

// --- Road classes (osm2po `clazz` codes) ---

/// Tertiary road.
pub const WAY_TYPE_TERTIARY: i32 = 31;
/// Cycleway.
pub const WAY_TYPE_CYCLEWAY: i32 = 81;
/// Catch-all for unlisted or missing classes.
pub const WAY_TYPE_OTHER: i32 = 69;

// --- Response messages ---

pub const NO_PATH_AVAILABLE_MESSAGE: &str = "No path available, try with other arguments.";
