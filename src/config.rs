use crate::constants::*;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub engine: EngineConfig,
    pub round_trip: RoundTripConfig,
}

/// Connection settings for the PostGIS/pgRouting spatial engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// osm2po-style edge table queried for nodes, candidates and paths
    pub network_table: String,

    /// Upper bound on pooled engine sessions
    pub max_connections: u32,

    /// Deadline for a single engine query
    pub query_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            network_table: DEFAULT_NETWORK_TABLE.to_string(),
            max_connections: DEFAULT_ENGINE_MAX_CONNECTIONS,
            query_timeout: Duration::from_millis(DEFAULT_ENGINE_QUERY_TIMEOUT_MS),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let network_table =
            env::var("ENGINE_NETWORK_TABLE").unwrap_or_else(|_| defaults.network_table.clone());
        if !is_sql_identifier(&network_table) {
            return Err(format!(
                "ENGINE_NETWORK_TABLE must be a plain identifier, got '{}'",
                network_table
            ));
        }

        let timeout_ms: u64 = env::var("ENGINE_QUERY_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_ENGINE_QUERY_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|_| "Invalid ENGINE_QUERY_TIMEOUT_MS")?;
        if timeout_ms == 0 {
            return Err("ENGINE_QUERY_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(Self {
            network_table,
            max_connections: env::var("ENGINE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| defaults.max_connections.to_string())
                .parse()
                .map_err(|_| "Invalid ENGINE_MAX_CONNECTIONS")?,
            query_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Accepts `[A-Za-z_][A-Za-z0-9_]*`, optionally schema-qualified once.
fn is_sql_identifier(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[derive(Debug, Clone)]
pub struct RoundTripConfig {
    /// Fraction the loop may be shorter or longer than requested when
    /// searching for turnaround candidates (0.25 = ±25%)
    pub distance_margin: f64,

    /// Edges with a dispose value strictly above this are excluded from the
    /// alternate path search
    pub dispose_threshold: f64,

    /// Number of shortest paths requested for the primary route set
    pub k_paths: u32,

    /// Meters added around the extended search radius for the routing bbox
    pub routing_bbox_padding_m: f64,

    /// Candidate search bbox half-size as a multiple of the max search radius
    pub candidate_bbox_factor: f64,

    /// Preferred road classes, most preferred first (without the catch-all)
    pub way_priority: Vec<i32>,

    /// Catch-all class for unlisted or missing road classes
    pub other_way_type: i32,

    /// Run the four sector pipelines concurrently on separate engine sessions
    pub parallel_sectors: bool,
}

impl Default for RoundTripConfig {
    fn default() -> Self {
        Self {
            distance_margin: DEFAULT_DISTANCE_MARGIN,
            dispose_threshold: DEFAULT_DISPOSE_THRESHOLD,
            k_paths: DEFAULT_K_PATHS,
            routing_bbox_padding_m: DEFAULT_ROUTING_BBOX_PADDING_M,
            candidate_bbox_factor: DEFAULT_CANDIDATE_BBOX_FACTOR,
            way_priority: vec![WAY_TYPE_TERTIARY, WAY_TYPE_CYCLEWAY],
            other_way_type: WAY_TYPE_OTHER,
            parallel_sectors: false,
        }
    }
}

impl RoundTripConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let distance_margin: f64 = env::var("ROUTE_DISTANCE_MARGIN")
            .unwrap_or_else(|_| defaults.distance_margin.to_string())
            .parse()
            .map_err(|_| "Invalid ROUTE_DISTANCE_MARGIN")?;
        if !(distance_margin > 0.0 && distance_margin < 1.0) {
            return Err("ROUTE_DISTANCE_MARGIN must be between 0 and 1".to_string());
        }

        let dispose_threshold: f64 = env::var("ROUTE_DISPOSE_THRESHOLD")
            .unwrap_or_else(|_| defaults.dispose_threshold.to_string())
            .parse()
            .map_err(|_| "Invalid ROUTE_DISPOSE_THRESHOLD")?;
        if !(0.0..1.0).contains(&dispose_threshold) {
            return Err("ROUTE_DISPOSE_THRESHOLD must be in [0, 1)".to_string());
        }

        let k_paths: u32 = env::var("ROUTE_K_PATHS")
            .unwrap_or_else(|_| defaults.k_paths.to_string())
            .parse()
            .map_err(|_| "Invalid ROUTE_K_PATHS")?;
        if k_paths == 0 {
            return Err("ROUTE_K_PATHS must be at least 1".to_string());
        }

        let routing_bbox_padding_m: f64 = env::var("ROUTE_BBOX_PADDING_M")
            .unwrap_or_else(|_| defaults.routing_bbox_padding_m.to_string())
            .parse()
            .map_err(|_| "Invalid ROUTE_BBOX_PADDING_M")?;
        if !(routing_bbox_padding_m.is_finite() && routing_bbox_padding_m >= 0.0) {
            return Err("ROUTE_BBOX_PADDING_M must be a finite number >= 0".to_string());
        }

        let candidate_bbox_factor: f64 = env::var("ROUTE_CANDIDATE_BBOX_FACTOR")
            .unwrap_or_else(|_| defaults.candidate_bbox_factor.to_string())
            .parse()
            .map_err(|_| "Invalid ROUTE_CANDIDATE_BBOX_FACTOR")?;
        if !(candidate_bbox_factor.is_finite() && candidate_bbox_factor > 0.0) {
            return Err("ROUTE_CANDIDATE_BBOX_FACTOR must be a finite number > 0".to_string());
        }

        let way_priority = match env::var("ROUTE_WAY_PRIORITY") {
            Ok(raw) => parse_way_priority(&raw)?,
            Err(_) => defaults.way_priority,
        };

        Ok(Self {
            distance_margin,
            dispose_threshold,
            k_paths,
            routing_bbox_padding_m,
            candidate_bbox_factor,
            way_priority,
            other_way_type: env::var("ROUTE_OTHER_WAY_TYPE")
                .unwrap_or_else(|_| defaults.other_way_type.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_OTHER_WAY_TYPE")?,
            parallel_sectors: env::var("ROUTE_PARALLEL_SECTORS")
                .unwrap_or_else(|_| defaults.parallel_sectors.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_PARALLEL_SECTORS")?,
        })
    }
}

fn parse_way_priority(raw: &str) -> Result<Vec<i32>, String> {
    let classes = raw
        .split(',')
        .map(|code| code.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("Invalid ROUTE_WAY_PRIORITY: '{}'", raw))?;

    if classes.is_empty() {
        return Err("ROUTE_WAY_PRIORITY must list at least one class".to_string());
    }
    Ok(classes)
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            engine: EngineConfig::from_env()?,
            round_trip: RoundTripConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
