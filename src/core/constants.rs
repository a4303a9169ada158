//! Core constants derived from Leaflet defaults and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels; zoom 0 of an earth CRS is this wide.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the spherical (Web) Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Equatorial radius used by the Mercator projections (WGS84 semi-major axis).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// WGS84 semi-minor axis, used by the elliptical Mercator projection.
pub const EARTH_RADIUS_MINOR: f64 = 6_356_752.314_245_179;

/// Mean earth radius used for haversine distances.
pub const EARTH_MEAN_RADIUS: f64 = 6_371_000.0;

/// Equatorial circumference used by `LatLng::to_bounds`.
pub const EARTH_CIRCUMFERENCE: f64 = 40_075_017.0;

/// Default margin of error for `LatLng` equality.
pub const LAT_LNG_MARGIN: f64 = 1.0e-9;

/// Below this bounding area (in CRS distance units squared) centroid
/// computations re-center coordinates near the origin first.
///
/// The value is empirical.
pub const CENTROID_AREA_THRESHOLD: f64 = 1700.0;

/// Minimum interval between two pointer hover hit-tests, in milliseconds.
pub const HOVER_THROTTLE_MS: u64 = 32;

/// Fraction of the view size the renderer surface extends beyond each edge.
pub const DEFAULT_RENDERER_PADDING: f64 = 0.1;

/// Default polyline simplification tolerance in pixels.
pub const DEFAULT_SMOOTH_FACTOR: f64 = 1.0;

/// Zoom limits of a view that does not set its own.
pub const DEFAULT_MIN_ZOOM: f64 = 0.0;
pub const DEFAULT_MAX_ZOOM: f64 = 18.0;

/// Default circle marker radius in pixels.
pub const DEFAULT_CIRCLE_MARKER_RADIUS: f64 = 10.0;

/// Elliptical Mercator inverse: iteration cap and convergence threshold.
pub const MERCATOR_MAX_ITERATIONS: usize = 15;
pub const MERCATOR_CONVERGENCE: f64 = 1.0e-7;
