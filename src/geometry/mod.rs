//! Computational geometry used by vector shapes.

pub mod line_util;
pub mod poly_util;

pub use line_util::{
    clip_segment, closest_point_on_segment, point_to_segment_distance, polyline_center, simplify,
    OutCode, SegmentClip,
};
pub use poly_util::{clip_polygon, polygon_center};
