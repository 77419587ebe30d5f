//! SQL issued against the osm2po/pgRouting edge table.
//!
//! The table name comes from validated configuration; every value that varies
//! per request is a bind parameter. The pgr_KSP inner edge query is rendered
//! server-side with `format()`, so the excluded edge ids travel as a
//! `bigint[]` parameter and are quoted by PostgreSQL (`%L`).

#[derive(Debug, Clone)]
pub struct EngineQueries {
    pub nearest_node: String,
    pub candidates_in_annulus: String,
    pub k_shortest_paths: String,
    pub union_length: String,
}

impl EngineQueries {
    pub fn for_table(table: &str) -> Self {
        EngineQueries {
            nearest_node: nearest_node_sql(table),
            candidates_in_annulus: candidates_in_annulus_sql(table),
            k_shortest_paths: k_shortest_paths_sql(table),
            union_length: UNION_LENGTH_SQL.to_string(),
        }
    }
}

/// $1 lng, $2 lat
fn nearest_node_sql(table: &str) -> String {
    format!(
        "SELECT y1::float8 AS lat, x1::float8 AS lng, source::int8 AS node_id
         FROM {table}
         ORDER BY ST_Distance(geom_way, ST_SetSRID(ST_MakePoint($1, $2), 4326))
         LIMIT 1"
    )
}

/// $1 center lng, $2 center lat, $3..$6 bbox (xmin, ymin, xmax, ymax),
/// $7 min radius m, $8 max radius m, $9 optimal radius m
fn candidates_in_annulus_sql(table: &str) -> String {
    format!(
        "WITH center AS (SELECT ST_SetSRID(ST_MakePoint($1, $2), 4326) AS geom),
         ranged AS (
             SELECT s.y1::float8 AS lat, s.x1::float8 AS lng, s.source::int8 AS node_id,
                    ST_DistanceSphere(center.geom, s.geom_way) AS distance_m,
                    s.clazz::int4 AS way_type
             FROM {table} AS s, center
             WHERE s.geom_way && ST_MakeEnvelope($3, $4, $5, $6, 4326)
         )
         SELECT lat, lng, node_id, distance_m, way_type
         FROM ranged
         WHERE distance_m > $7 AND distance_m < $8
         ORDER BY ABS(distance_m - $9) ASC"
    )
}

/// $1..$4 bbox (xmin, ymin, xmax, ymax), $5 excluded edge ids (bigint[]),
/// $6 start node, $7 end node, $8 k
fn k_shortest_paths_sql(table: &str) -> String {
    format!(
        "SELECT r.seq::int8 AS seq, r.path_id::int8 AS route_id, r.edge::int8 AS edge_id,
                s.geom_way::text AS geometry
         FROM pgr_KSP(
             format(
                 'SELECT id, source, target, ST_Length(geom_way::geography) AS cost
                  FROM {table}
                  WHERE geom_way && ST_MakeEnvelope(%s, %s, %s, %s, 4326)
                    AND NOT (id = ANY(%L))',
                 $1::float8, $2::float8, $3::float8, $4::float8, $5::int8[]
             ),
             $6::int8, $7::int8, $8::int4, false
         ) AS r
         INNER JOIN {table} AS s ON r.edge = s.id
         ORDER BY r.seq ASC"
    )
}

/// $1 hex EWKB geometries (text[])
const UNION_LENGTH_SQL: &str = "WITH parts AS (SELECT DISTINCT g FROM unnest($1::text[]) AS t(g)),
     merged AS (SELECT ST_Union(g::geometry) AS geom FROM parts)
     SELECT ST_AsGeoJSON(geom) AS geojson, ST_Length(geom::geography)::float8 AS length_m
     FROM merged";
