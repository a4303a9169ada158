//! Polyline algorithms in pixel space: simplification, point-to-segment
//! distance and Cohen-Sutherland segment clipping.

use crate::core::{
    bounds::Bounds,
    constants::CENTROID_AREA_THRESHOLD,
    geo::{LatLng, LatLngBounds, Point},
};
use crate::crs::Crs;
use crate::{MapError, Result};

/// Cohen-Sutherland outcode: which sides of a rectangle a point lies beyond
pub type OutCode = u8;

pub const LEFT: OutCode = 1;
pub const RIGHT: OutCode = 2;
/// Beyond `min.y`
pub const BOTTOM: OutCode = 4;
/// Beyond `max.y`
pub const TOP: OutCode = 8;

/// Result of [`clip_segment`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentClip {
    /// The visible part of the segment, `None` when it lies fully outside
    pub segment: Option<(Point, Point)>,
    /// Outcode of the original end point; pass it as `prev_code` when
    /// clipping the next segment of the same line
    pub end_code: OutCode,
    /// The end point was replaced by an edge intersection, so the line
    /// leaves the clip rectangle here
    pub end_clipped: bool,
}

/// Reduces the vertex count of a polyline while keeping its shape within
/// `tolerance` pixels
///
/// Radial distance reduction followed by Douglas-Peucker. First and last
/// points are always kept. A tolerance of zero returns the input unchanged.
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if tolerance == 0.0 || points.is_empty() {
        return points.to_vec();
    }

    let sq_tolerance = tolerance * tolerance;
    let reduced = reduce_points(points, sq_tolerance);
    simplify_dp(&reduced, sq_tolerance)
}

/// Distance from `p` to the segment `p1`-`p2`
pub fn point_to_segment_distance(p: &Point, p1: &Point, p2: &Point) -> f64 {
    p.squared_distance_to(&closest_point_on_segment(p, p1, p2)).sqrt()
}

/// The point on segment `p1`-`p2` closest to `p`
///
/// A zero-length segment is treated as the single point `p1`.
pub fn closest_point_on_segment(p: &Point, p1: &Point, p2: &Point) -> Point {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let dot = dx * dx + dy * dy;

    if dot > 0.0 {
        let t = ((p.x - p1.x) * dx + (p.y - p1.y) * dy) / dot;
        if t > 1.0 {
            return *p2;
        } else if t > 0.0 {
            return Point::new(p1.x + dx * t, p1.y + dy * t);
        }
    }

    *p1
}

fn sq_segment_distance(p: &Point, p1: &Point, p2: &Point) -> f64 {
    p.squared_distance_to(&closest_point_on_segment(p, p1, p2))
}

fn reduce_points(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let mut reduced = vec![points[0]];
    let mut prev = 0;

    for (i, point) in points.iter().enumerate().skip(1) {
        if point.squared_distance_to(&points[prev]) > sq_tolerance {
            reduced.push(*point);
            prev = i;
        }
    }

    if prev < points.len() - 1 {
        reduced.push(points[points.len() - 1]);
    }

    reduced
}

fn simplify_dp(points: &[Point], sq_tolerance: f64) -> Vec<Point> {
    let len = points.len();
    let mut markers = vec![false; len];
    markers[0] = true;
    markers[len - 1] = true;

    let mut stack = vec![(0, len - 1)];
    while let Some((first, last)) = stack.pop() {
        let mut max_sq_dist = 0.0;
        let mut index = first;

        for i in first + 1..last {
            let sq_dist = sq_segment_distance(&points[i], &points[first], &points[last]);
            if sq_dist > max_sq_dist {
                index = i;
                max_sq_dist = sq_dist;
            }
        }

        if max_sq_dist > sq_tolerance {
            markers[index] = true;
            stack.push((index, last));
            stack.push((first, index));
        }
    }

    points
        .iter()
        .zip(markers)
        .filter_map(|(point, keep)| keep.then_some(*point))
        .collect()
}

/// Outcode of `p` relative to `bounds`; points on an edge are inside
pub fn bit_code(p: &Point, bounds: &Bounds) -> OutCode {
    let mut code = 0;

    if p.x < bounds.min.x {
        code |= LEFT;
    } else if p.x > bounds.max.x {
        code |= RIGHT;
    }

    if p.y < bounds.min.y {
        code |= BOTTOM;
    } else if p.y > bounds.max.y {
        code |= TOP;
    }

    code
}

/// Intersection of segment `a`-`b` with the edge named by `code`
///
/// When several bits are set the first of top, bottom, right, left wins.
pub fn edge_intersection(
    a: &Point,
    b: &Point,
    code: OutCode,
    bounds: &Bounds,
    round: bool,
) -> Result<Point> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let min = bounds.min;
    let max = bounds.max;

    let point = if code & TOP != 0 {
        Point::new(a.x + dx * (max.y - a.y) / dy, max.y)
    } else if code & BOTTOM != 0 {
        Point::new(a.x + dx * (min.y - a.y) / dy, min.y)
    } else if code & RIGHT != 0 {
        Point::new(max.x, a.y + dy * (max.x - a.x) / dx)
    } else if code & LEFT != 0 {
        Point::new(min.x, a.y + dy * (min.x - a.x) / dx)
    } else {
        return Err(MapError::DegenerateGeometry(format!(
            "no edge to intersect for segment {} - {}",
            a, b
        )));
    };

    Ok(if round { point.round() } else { point })
}

/// Clips segment `a`-`b` to `bounds`
///
/// `prev_code` is the `end_code` of the previous segment of the same line;
/// passing it skips recomputing the start outcode.
pub fn clip_segment(
    a: &Point,
    b: &Point,
    bounds: &Bounds,
    prev_code: Option<OutCode>,
    round: bool,
) -> Result<SegmentClip> {
    let mut code_a = prev_code.unwrap_or_else(|| bit_code(a, bounds));
    let mut code_b = bit_code(b, bounds);
    let end_code = code_b;

    let mut a = *a;
    let mut b_out = *b;
    let mut end_clipped = false;

    loop {
        if code_a | code_b == 0 {
            return Ok(SegmentClip {
                segment: Some((a, b_out)),
                end_code,
                end_clipped,
            });
        }

        if code_a & code_b != 0 {
            return Ok(SegmentClip {
                segment: None,
                end_code,
                end_clipped,
            });
        }

        let code_out = if code_a != 0 { code_a } else { code_b };
        let p = edge_intersection(&a, &b_out, code_out, bounds, round)?;
        let new_code = bit_code(&p, bounds);

        if code_out == code_a {
            a = p;
            code_a = new_code;
        } else {
            b_out = p;
            code_b = new_code;
            end_clipped = true;
        }
    }
}

/// Geographic center of a polyline: the point halfway along its length
///
/// Very small lines (bounding area below [`CENTROID_AREA_THRESHOLD`] in CRS
/// distance units) are re-centred on their vertex average before projecting,
/// which keeps the arithmetic away from large projected magnitudes.
pub fn polyline_center(lat_lngs: &[LatLng], crs: &Crs) -> Result<LatLng> {
    let bounds = LatLngBounds::from_points(lat_lngs)
        .ok_or_else(|| MapError::EmptyCoordinates("polyline center".to_string()))?;
    let offset = centroid_offset(&bounds, lat_lngs, crs);
    let points = project_relative(lat_lngs, &offset, crs);

    let half_dist: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1]) / 2.0).sum();

    let mut center = points[0];
    if half_dist != 0.0 {
        let mut dist = 0.0;
        for w in points.windows(2) {
            let (p1, p2) = (w[0], w[1]);
            let seg_dist = p1.distance_to(&p2);
            dist += seg_dist;

            if dist > half_dist {
                let ratio = (dist - half_dist) / seg_dist;
                center = Point::new(p2.x - ratio * (p2.x - p1.x), p2.y - ratio * (p2.y - p1.y));
                break;
            }
        }
    }

    Ok(translate_back(crs.unproject(&center), &offset))
}

/// Offset subtracted before projecting in centroid computations
pub(crate) fn centroid_offset(bounds: &LatLngBounds, lat_lngs: &[LatLng], crs: &Crs) -> LatLng {
    let area_bounds = crs.distance(&bounds.north_west(), &bounds.south_west)
        * crs.distance(&bounds.north_east, &bounds.north_west());

    if area_bounds < CENTROID_AREA_THRESHOLD {
        average(lat_lngs)
    } else {
        LatLng::new(0.0, 0.0)
    }
}

pub(crate) fn project_relative(lat_lngs: &[LatLng], offset: &LatLng, crs: &Crs) -> Vec<Point> {
    lat_lngs
        .iter()
        .map(|ll| crs.project(&LatLng::new(ll.lat - offset.lat, ll.lng - offset.lng)))
        .collect()
}

pub(crate) fn translate_back(lat_lng: LatLng, offset: &LatLng) -> LatLng {
    LatLng::new(lat_lng.lat + offset.lat, lat_lng.lng + offset.lng)
}

fn average(lat_lngs: &[LatLng]) -> LatLng {
    let n = lat_lngs.len() as f64;
    let (lat_sum, lng_sum) = lat_lngs
        .iter()
        .fold((0.0, 0.0), |(lat, lng), ll| (lat + ll.lat, lng + ll.lng));
    LatLng::new(lat_sum / n, lng_sum / n)
}
