use crate::{
    core::{
        bounds::Bounds,
        geo::{LatLng, LatLngBounds, Point},
    },
    crs::Crs,
    geometry::poly_util::{clip_polygon, contains_point, polygon_center},
    layers::{
        path::{PathGeometry, PathProperties, PathStyle, VectorPath},
        polyline::{update_px_bounds, PolylineOptions, ProjectedRings},
    },
    traits::MapView,
    Result,
};

/// A filled area: one or more polygons, each an outer ring plus holes
///
/// Rings are implicitly closed; a repeated first point at the end of a ring is
/// dropped on input.
#[derive(Debug, Clone)]
pub struct Polygon {
    properties: PathProperties,
    pub options: PolylineOptions,
    lat_lngs: Vec<Vec<Vec<LatLng>>>,
    projected: ProjectedRings,
}

impl Polygon {
    pub fn new(outer: Vec<LatLng>) -> Self {
        Self::with_holes(outer, Vec::new())
    }

    pub fn with_holes(outer: Vec<LatLng>, holes: Vec<Vec<LatLng>>) -> Self {
        let mut rings = vec![outer];
        rings.extend(holes);
        Self::multi(vec![rings])
    }

    /// Several polygons drawn as one path
    pub fn multi(polygons: Vec<Vec<Vec<LatLng>>>) -> Self {
        Self {
            properties: PathProperties::new(PathStyle::filled()),
            options: PolylineOptions::default(),
            lat_lngs: strip_closing_points(polygons),
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

    pub fn lat_lngs(&self) -> &[Vec<Vec<LatLng>>] {
        &self.lat_lngs
    }

    pub fn set_lat_lngs(&mut self, outer: Vec<LatLng>, holes: Vec<Vec<LatLng>>) {
        let mut rings = vec![outer];
        rings.extend(holes);
        self.lat_lngs = strip_closing_points(vec![rings]);
    }

    pub fn set_multi_lat_lngs(&mut self, polygons: Vec<Vec<Vec<LatLng>>>) {
        self.lat_lngs = strip_closing_points(polygons);
    }

    /// Appends a point to the outer ring of the first polygon
    pub fn add_lat_lng(&mut self, lat_lng: LatLng) {
        match self.lat_lngs.first_mut().and_then(|rings| rings.first_mut()) {
            Some(ring) => ring.push(lat_lng),
            None => self.lat_lngs = vec![vec![vec![lat_lng]]],
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        let all: Vec<LatLng> = self.lat_lngs.iter().flatten().flatten().copied().collect();
        LatLngBounds::from_points(&all)
    }

    /// Centroid of the outer ring of the first polygon
    pub fn center(&self, crs: &Crs) -> Result<LatLng> {
        let outer = self
            .lat_lngs
            .first()
            .and_then(|rings| rings.first())
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        polygon_center(outer, crs)
    }

    pub fn parts(&self) -> &[Vec<Point>] {
        &self.projected.parts
    }

    fn clip_points(&mut self, clip_bounds: &Bounds) -> Result<()> {
        self.projected.parts.clear();

        // Grown by the stroke weight so clipped edges stay off-surface.
        let bounds = clip_bounds.padded(self.properties.style.weight);

        match self.properties.px_bounds {
            Some(px_bounds) if px_bounds.intersects(&bounds) => {}
            _ => return Ok(()),
        }

        if self.options.no_clip {
            self.projected.parts = self.projected.rings.clone();
            return Ok(());
        }

        for ring in &self.projected.rings {
            let clipped = clip_polygon(ring, &bounds, true)?;
            if !clipped.is_empty() {
                self.projected.parts.push(clipped);
            }
        }

        Ok(())
    }
}

fn strip_closing_points(mut polygons: Vec<Vec<Vec<LatLng>>>) -> Vec<Vec<Vec<LatLng>>> {
    for ring in polygons.iter_mut().flatten() {
        let len = ring.len();
        if len >= 2 && ring[0].equals(&ring[len - 1]) {
            ring.pop();
        }
    }
    polygons
}

impl VectorPath for Polygon {
    impl_path_properties!(properties);

    fn project(&mut self, view: &dyn MapView, renderer_tolerance: f64) -> Result<()> {
        self.projected.project(view, self.lat_lngs.iter().flatten());
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
            closed: true,
        }
    }

    fn contains_point(&self, point: &Point) -> bool {
        match self.properties.px_bounds {
            Some(px_bounds) if px_bounds.contains(point) => {
                contains_point(&self.projected.parts, point)
                    || self
                        .projected
                        .stroke_contains(point, true, self.properties.click_tolerance)
            }
            _ => false,
        }
    }

    fn is_empty(&self) -> bool {
        self.lat_lngs
            .first()
            .and_then(|rings| rings.first())
            .map_or(true, |outer| outer.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Viewport;

    fn view() -> Viewport {
        Viewport::new(Crs::simple(), LatLng::new(0.0, 0.0), 0.0, Point::new(200.0, 200.0))
    }

    fn square(lat: f64, lng: f64, size: f64) -> Vec<LatLng> {
        vec![
            LatLng::new(lat, lng),
            LatLng::new(lat, lng + size),
            LatLng::new(lat + size, lng + size),
            LatLng::new(lat + size, lng),
        ]
    }

    fn projected(mut polygon: Polygon) -> Polygon {
        polygon
            .project(&view(), 0.0)
            .and_then(|_| polygon.update(&Bounds::from_coords(0.0, 0.0, 200.0, 200.0)))
            .unwrap();
        polygon
    }

    #[test]
    fn test_closing_point_stripped() {
        let mut ring = square(0.0, 0.0, 10.0);
        ring.push(LatLng::new(0.0, 0.0));
        let polygon = Polygon::new(ring);
        assert_eq!(polygon.lat_lngs()[0][0].len(), 4);
        assert!(polygon.style().fill);
    }

    #[test]
    fn test_inside_surface_unchanged() {
        let polygon = projected(Polygon::new(square(-10.0, -10.0, 20.0)));
        assert_eq!(
            polygon.parts(),
            &[vec![
                Point::new(90.0, 110.0),
                Point::new(110.0, 110.0),
                Point::new(110.0, 90.0),
                Point::new(90.0, 90.0),
            ]]
        );
    }

    #[test]
    fn test_clipped_to_padded_surface() {
        let polygon = projected(Polygon::new(square(-10.0, 0.0, 300.0)));
        let part = &polygon.parts()[0];
        let max_x = part.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_y = part.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        assert_eq!(max_x, 203.0);
        assert_eq!(min_y, -3.0);
    }

    #[test]
    fn test_contains_point_respects_holes() {
        let polygon = projected(Polygon::with_holes(
            square(-50.0, -50.0, 100.0),
            vec![square(-10.0, -10.0, 20.0)],
        ));
        assert!(polygon.contains_point(&Point::new(60.0, 60.0)));
        assert!(!polygon.contains_point(&Point::new(100.0, 100.0)));
        // On the hole's outline the stroke still counts.
        assert!(polygon.contains_point(&Point::new(90.0, 100.0)));
        assert!(!polygon.contains_point(&Point::new(160.0, 100.0)));
    }

    #[test]
    fn test_center_and_empty() {
        let polygon = Polygon::new(square(0.0, 0.0, 10.0));
        let center = polygon.center(&Crs::simple()).unwrap();
        assert!(center.equals_within(&LatLng::new(5.0, 5.0), 1e-9));

        let mut empty = Polygon::new(vec![]);
        assert!(empty.is_empty());
        empty.add_lat_lng(LatLng::new(1.0, 1.0));
        assert!(!empty.is_empty());
    }
}
