//! Building shapes from `geo-types` geometries
//!
//! Coordinates follow the GeoJSON axis order: `x` is longitude, `y` latitude.

use crate::{
    core::geo::{LatLng, LatLngBounds},
    layers::{
        circle_marker::CircleMarker, path::VectorPath, polygon::Polygon, polyline::Polyline,
    },
    MapError, Result,
};
use geo_types::{Coord, Geometry, LineString, MultiLineString, MultiPolygon, Rect};

impl From<Coord<f64>> for LatLng {
    fn from(coord: Coord<f64>) -> Self {
        LatLng::new(coord.y, coord.x)
    }
}

impl From<LatLng> for Coord<f64> {
    fn from(lat_lng: LatLng) -> Self {
        Coord {
            x: lat_lng.lng,
            y: lat_lng.lat,
        }
    }
}

impl From<geo_types::Point<f64>> for LatLng {
    fn from(point: geo_types::Point<f64>) -> Self {
        point.0.into()
    }
}

impl From<Rect<f64>> for LatLngBounds {
    fn from(rect: Rect<f64>) -> Self {
        LatLngBounds::new(rect.min().into(), rect.max().into())
    }
}

impl From<LatLngBounds> for Rect<f64> {
    fn from(bounds: LatLngBounds) -> Self {
        Rect::new(
            Coord::from(bounds.south_west),
            Coord::from(bounds.north_east),
        )
    }
}

fn ring(line: &LineString<f64>) -> Vec<LatLng> {
    line.coords().map(|coord| LatLng::from(*coord)).collect()
}

fn polygon_rings(polygon: &geo_types::Polygon<f64>) -> Vec<Vec<LatLng>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring)
        .collect()
}

impl From<&LineString<f64>> for Polyline {
    fn from(line: &LineString<f64>) -> Self {
        Polyline::new(ring(line))
    }
}

impl From<&MultiLineString<f64>> for Polyline {
    fn from(lines: &MultiLineString<f64>) -> Self {
        Polyline::multi(lines.iter().map(ring).collect())
    }
}

impl From<&geo_types::Polygon<f64>> for Polygon {
    fn from(polygon: &geo_types::Polygon<f64>) -> Self {
        Polygon::multi(vec![polygon_rings(polygon)])
    }
}

impl From<&MultiPolygon<f64>> for Polygon {
    fn from(polygons: &MultiPolygon<f64>) -> Self {
        Polygon::multi(polygons.iter().map(polygon_rings).collect())
    }
}

impl From<geo_types::Point<f64>> for CircleMarker {
    fn from(point: geo_types::Point<f64>) -> Self {
        CircleMarker::new(point.into())
    }
}

/// Builds the matching shape for any single geometry
///
/// Points become circle markers, lines polylines and areas polygons.
/// Collections of points or geometries have no single-path equivalent.
pub fn path_from_geometry(geometry: &Geometry<f64>) -> Result<Box<dyn VectorPath>> {
    let path: Box<dyn VectorPath> = match geometry {
        Geometry::Point(point) => Box::new(CircleMarker::from(*point)),
        Geometry::Line(line) => Box::new(Polyline::new(vec![
            line.start.into(),
            line.end.into(),
        ])),
        Geometry::LineString(line) => {
            require_coords(line.0.is_empty(), "line string")?;
            Box::new(Polyline::from(line))
        }
        Geometry::MultiLineString(lines) => {
            require_coords(lines.iter().all(|line| line.0.is_empty()), "multi line string")?;
            Box::new(Polyline::from(lines))
        }
        Geometry::Polygon(polygon) => {
            require_coords(polygon.exterior().0.is_empty(), "polygon")?;
            Box::new(Polygon::from(polygon))
        }
        Geometry::MultiPolygon(polygons) => {
            require_coords(polygons.0.is_empty(), "multi polygon")?;
            Box::new(Polygon::from(polygons))
        }
        Geometry::Rect(rect) => Box::new(Polygon::from(&rect.to_polygon())),
        Geometry::Triangle(triangle) => Box::new(Polygon::from(&triangle.to_polygon())),
        Geometry::MultiPoint(_) => {
            return Err(MapError::InvalidCoordinates(
                "multi point has no single-path shape".into(),
            ))
        }
        Geometry::GeometryCollection(_) => {
            return Err(MapError::InvalidCoordinates(
                "geometry collection has no single-path shape".into(),
            ))
        }
    };
    Ok(path)
}

fn require_coords(empty: bool, what: &str) -> Result<()> {
    if empty {
        return Err(MapError::EmptyCoordinates(what.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{line_string, point, polygon};

    #[test]
    fn test_coord_axis_order() {
        let lat_lng = LatLng::from(Coord { x: 13.4, y: 52.5 });
        assert_eq!(lat_lng, LatLng::new(52.5, 13.4));
        let coord: Coord<f64> = lat_lng.into();
        assert_eq!(coord, Coord { x: 13.4, y: 52.5 });
    }

    #[test]
    fn test_line_string_to_polyline() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 5.0)];
        let polyline = Polyline::from(&line);
        assert_eq!(
            polyline.lat_lngs(),
            &[vec![LatLng::new(0.0, 0.0), LatLng::new(5.0, 10.0)]]
        );
    }

    #[test]
    fn test_polygon_closing_point_dropped() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ];
        let shape = Polygon::from(&square);
        assert_eq!(shape.lat_lngs()[0][0].len(), 4);
    }

    #[test]
    fn test_path_from_geometry() {
        let marker = path_from_geometry(&Geometry::Point(point!(x: 1.0, y: 2.0))).unwrap();
        let marker = marker.as_any().downcast_ref::<CircleMarker>().unwrap();
        assert_eq!(marker.lat_lng(), LatLng::new(2.0, 1.0));

        let rect = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
        let shape = path_from_geometry(&Geometry::Rect(rect)).unwrap();
        assert!(shape.as_any().is::<Polygon>());

        let empty = Geometry::LineString(LineString::new(vec![]));
        assert!(matches!(
            path_from_geometry(&empty),
            Err(MapError::EmptyCoordinates(_))
        ));
        let points = Geometry::MultiPoint(vec![point!(x: 0.0, y: 0.0)].into());
        assert!(matches!(
            path_from_geometry(&points),
            Err(MapError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_bounds_rect_round_trip() {
        let bounds = LatLngBounds::from_coords(-10.0, -20.0, 10.0, 20.0);
        let rect: Rect<f64> = bounds.into();
        assert_eq!(rect.min(), Coord { x: -20.0, y: -10.0 });
        assert_eq!(LatLngBounds::from(rect), bounds);
    }
}
