//! Polygon clipping and centroids.

use crate::core::{
    bounds::Bounds,
    geo::{LatLng, LatLngBounds, Point},
};
use crate::crs::Crs;
use crate::geometry::line_util::{
    bit_code, centroid_offset, edge_intersection, project_relative, translate_back, OutCode,
    BOTTOM, LEFT, RIGHT, TOP,
};
use crate::{MapError, Result};

const CLIP_EDGES: [OutCode; 4] = [LEFT, BOTTOM, RIGHT, TOP];

/// Clips a closed ring to `bounds` (Sutherland-Hodgman)
///
/// The ring is implicitly closed; the result may be empty when nothing of the
/// polygon is inside. Clipping a concave polygon can produce degenerate
/// zero-width edges along the bounds, which render invisibly.
pub fn clip_polygon(points: &[Point], bounds: &Bounds, round: bool) -> Result<Vec<Point>> {
    let mut coded: Vec<(Point, OutCode)> = points
        .iter()
        .map(|p| (*p, bit_code(p, bounds)))
        .collect();

    for edge in CLIP_EDGES {
        let len = coded.len();
        let mut clipped = Vec::with_capacity(len + 1);

        for i in 0..len {
            let j = if i == 0 { len - 1 } else { i - 1 };
            let (a, code_a) = coded[i];
            let (b, code_b) = coded[j];

            if code_a & edge == 0 {
                if code_b & edge != 0 {
                    let p = edge_intersection(&b, &a, edge, bounds, round)?;
                    clipped.push((p, bit_code(&p, bounds)));
                }
                clipped.push((a, code_a));
            } else if code_b & edge == 0 {
                let p = edge_intersection(&b, &a, edge, bounds, round)?;
                clipped.push((p, bit_code(&p, bounds)));
            }
        }

        coded = clipped;
    }

    Ok(coded.into_iter().map(|(p, _)| p).collect())
}

/// Geographic centroid of a ring (shoelace formula on projected points)
///
/// A ring with zero signed area yields its first vertex.
pub fn polygon_center(lat_lngs: &[LatLng], crs: &Crs) -> Result<LatLng> {
    let bounds = LatLngBounds::from_points(lat_lngs)
        .ok_or_else(|| MapError::EmptyCoordinates("polygon center".to_string()))?;
    let offset = centroid_offset(&bounds, lat_lngs, crs);
    let points = project_relative(lat_lngs, &offset, crs);

    let (mut area, mut x, mut y) = (0.0, 0.0, 0.0);
    let len = points.len();
    for i in 0..len {
        let j = if i == 0 { len - 1 } else { i - 1 };
        let p1 = points[i];
        let p2 = points[j];

        let f = p1.y * p2.x - p2.y * p1.x;
        x += (p1.x + p2.x) * f;
        y += (p1.y + p2.y) * f;
        area += f * 3.0;
    }

    let center = if area == 0.0 {
        points[0]
    } else {
        Point::new(x / area, y / area)
    };

    Ok(translate_back(crs.unproject(&center), &offset))
}

/// Even-odd point-in-polygon test over a set of rings
///
/// Holes and separate polygons are handled alike: each ring the point is
/// inside toggles the result.
pub fn contains_point(rings: &[Vec<Point>], p: &Point) -> bool {
    let mut inside = false;

    for ring in rings {
        let len = ring.len();
        for i in 0..len {
            let j = if i == 0 { len - 1 } else { i - 1 };
            let p1 = ring[i];
            let p2 = ring[j];

            if ((p1.y > p.y) != (p2.y > p.y))
                && (p.x < (p2.x - p1.x) * (p.y - p1.y) / (p2.y - p1.y) + p1.x)
            {
                inside = !inside;
            }
        }
    }

    inside
}
