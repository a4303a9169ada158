use crate::{
    core::{
        bounds::Bounds,
        constants::DEFAULT_SMOOTH_FACTOR,
        geo::{LatLng, LatLngBounds, Point},
    },
    crs::Crs,
    geometry::line_util::{
        clip_segment, closest_point_on_segment, point_to_segment_distance, polyline_center,
        simplify,
    },
    layers::path::{PathGeometry, PathProperties, PathStyle, VectorPath},
    traits::MapView,
    Result,
};
use serde::{Deserialize, Serialize};

/// Options for line-like shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolylineOptions {
    /// Simplification tolerance in pixels; higher is faster and coarser
    pub smooth_factor: f64,
    /// Skip clipping against the surface bounds
    pub no_clip: bool,
}

impl Default for PolylineOptions {
    fn default() -> Self {
        Self {
            smooth_factor: DEFAULT_SMOOTH_FACTOR,
            no_clip: false,
        }
    }
}

/// Projected state shared by polylines and polygons
#[derive(Debug, Clone, Default)]
pub(crate) struct ProjectedRings {
    /// Every ring in layer pixels, unclipped
    pub rings: Vec<Vec<Point>>,
    pub raw_px_bounds: Option<Bounds>,
    /// What is actually drawn: clipped and simplified
    pub parts: Vec<Vec<Point>>,
}

impl ProjectedRings {
    pub fn project<'a>(
        &mut self,
        view: &dyn MapView,
        lat_lng_rings: impl Iterator<Item = &'a Vec<LatLng>>,
    ) {
        let mut bounds = Bounds::empty();
        self.rings = lat_lng_rings
            .map(|ring| {
                ring.iter()
                    .map(|lat_lng| {
                        let point = view.lat_lng_to_layer_point(lat_lng);
                        bounds.extend(&point);
                        point
                    })
                    .collect()
            })
            .collect();
        self.raw_px_bounds = bounds.is_valid().then_some(bounds);
    }

    pub fn simplify_parts(&mut self, smooth_factor: f64) {
        for part in &mut self.parts {
            *part = simplify(part, smooth_factor);
        }
    }

    /// Whether `point` lies within `tolerance` of any drawn segment
    pub fn stroke_contains(&self, point: &Point, closed: bool, tolerance: f64) -> bool {
        self.parts.iter().any(|part| {
            let len = part.len();
            (0..len).any(|j| {
                if !closed && j == 0 {
                    return false;
                }
                let k = if j == 0 { len - 1 } else { j - 1 };
                point_to_segment_distance(point, &part[k], &part[j]) <= tolerance
            })
        })
    }
}

/// Updates `properties` after projection: click tolerance and padded bounds
pub(crate) fn update_px_bounds(
    properties: &mut PathProperties,
    raw_px_bounds: Option<Bounds>,
    renderer_tolerance: f64,
) {
    let tolerance = properties.style.click_tolerance(renderer_tolerance);
    properties.click_tolerance = tolerance;
    properties.px_bounds = raw_px_bounds.map(|bounds| bounds.padded(tolerance));
}

/// A line through geographic points, optionally made of several parts
#[derive(Debug, Clone)]
pub struct Polyline {
    properties: PathProperties,
    pub options: PolylineOptions,
    lat_lngs: Vec<Vec<LatLng>>,
    projected: ProjectedRings,
}

impl Polyline {
    pub fn new(lat_lngs: Vec<LatLng>) -> Self {
        Self::multi(vec![lat_lngs])
    }

    /// A line made of several disconnected parts
    pub fn multi(lat_lngs: Vec<Vec<LatLng>>) -> Self {
        Self {
            properties: PathProperties::new(PathStyle::default()),
            options: PolylineOptions::default(),
            lat_lngs,
            projected: ProjectedRings::default(),
        }
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.properties.style = style;
        self
    }

    pub fn with_options(mut self, options: PolylineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn lat_lngs(&self) -> &[Vec<LatLng>] {
        &self.lat_lngs
    }

    pub fn set_lat_lngs(&mut self, lat_lngs: Vec<LatLng>) {
        self.lat_lngs = vec![lat_lngs];
    }

    pub fn set_multi_lat_lngs(&mut self, lat_lngs: Vec<Vec<LatLng>>) {
        self.lat_lngs = lat_lngs;
    }

    /// Appends a point to the first part
    pub fn add_lat_lng(&mut self, lat_lng: LatLng) {
        match self.lat_lngs.first_mut() {
            Some(ring) => ring.push(lat_lng),
            None => self.lat_lngs.push(vec![lat_lng]),
        }
    }

    /// Geographic bounds of all parts
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let all: Vec<LatLng> = self.lat_lngs.iter().flatten().copied().collect();
        LatLngBounds::from_points(&all)
    }

    /// The point halfway along the first part
    pub fn center(&self, crs: &Crs) -> Result<LatLng> {
        polyline_center(self.lat_lngs.first().map(Vec::as_slice).unwrap_or(&[]), crs)
    }

    /// Clipped and simplified parts, in layer pixels
    pub fn parts(&self) -> &[Vec<Point>] {
        &self.projected.parts
    }

    /// The point on the drawn line closest to `point`, and its distance
    pub fn closest_layer_point(&self, point: &Point) -> Option<(Point, f64)> {
        let mut min_distance = f64::INFINITY;
        let mut closest = None;

        for part in &self.projected.parts {
            for segment in part.windows(2) {
                let candidate = closest_point_on_segment(point, &segment[0], &segment[1]);
                let sq_dist = point.squared_distance_to(&candidate);
                if sq_dist < min_distance {
                    min_distance = sq_dist;
                    closest = Some(candidate);
                }
            }
        }

        closest.map(|p| (p, min_distance.sqrt()))
    }

    fn clip_points(&mut self, clip_bounds: &Bounds) -> Result<()> {
        self.projected.parts.clear();

        match self.properties.px_bounds {
            Some(px_bounds) if px_bounds.intersects(clip_bounds) => {}
            _ => return Ok(()),
        }

        if self.options.no_clip {
            self.projected.parts = self.projected.rings.clone();
            return Ok(());
        }

        for ring in &self.projected.rings {
            let mut part = Vec::new();
            let mut prev_code = None;
            let len = ring.len();

            for j in 0..len.saturating_sub(1) {
                let clip = clip_segment(&ring[j], &ring[j + 1], clip_bounds, prev_code, true)?;
                prev_code = Some(clip.end_code);

                let Some((start, end)) = clip.segment else {
                    continue;
                };
                part.push(start);

                // The line leaves the surface here, or this is its last segment.
                if clip.end_clipped || j == len - 2 {
                    part.push(end);
                    self.projected.parts.push(std::mem::take(&mut part));
                }
            }

            if !part.is_empty() {
                self.projected.parts.push(part);
            }
        }

        Ok(())
    }
}

impl VectorPath for Polyline {
    impl_path_properties!(properties);

    fn project(&mut self, view: &dyn MapView, renderer_tolerance: f64) -> Result<()> {
        self.projected.project(view, self.lat_lngs.iter());
        update_px_bounds(
            &mut self.properties,
            self.projected.raw_px_bounds,
            renderer_tolerance,
        );
        Ok(())
    }

    fn update(&mut self, clip_bounds: &Bounds) -> Result<()> {
        self.clip_points(clip_bounds)?;
        self.projected.simplify_parts(self.options.smooth_factor);
        Ok(())
    }

    fn geometry(&self) -> PathGeometry<'_> {
        PathGeometry::Poly {
            parts: &self.projected.parts,
            closed: false,
        }
    }

    fn contains_point(&self, point: &Point) -> bool {
        match self.properties.px_bounds {
            Some(px_bounds) if px_bounds.contains(point) => {
                self.projected
                    .stroke_contains(point, false, self.properties.click_tolerance)
            }
            _ => false,
        }
    }

    fn is_empty(&self) -> bool {
        self.lat_lngs.iter().all(|ring| ring.is_empty())
    }
}
