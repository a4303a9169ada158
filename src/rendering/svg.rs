use crate::{
    core::{bounds::Bounds, geo::Point},
    layers::path::{PathStyle, VectorPath},
    rendering::{arena::PathId, backend::RenderBackend},
};
use fxhash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// A retained `<path>` element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SvgPathElement {
    pub id: PathId,
    pub d: String,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl SvgPathElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Placement of the root `<svg>` element
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SvgSurface {
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// `min-x min-y width height`
    pub view_box: [f64; 4],
    pub transform: Option<(Point, f64)>,
}

/// Retained backend keeping one path element per vector path
#[derive(Debug, Default)]
pub struct SvgBackend {
    elements: FxHashMap<PathId, SvgPathElement>,
    /// Document order of attached elements, bottom first
    document: Vec<PathId>,
    surface: Option<SvgSurface>,
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: PathId) -> Option<&SvgPathElement> {
        self.elements.get(&id)
    }

    /// Attached elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &SvgPathElement> {
        self.document.iter().filter_map(|id| self.elements.get(id))
    }

    pub fn document_order(&self) -> &[PathId] {
        &self.document
    }

    pub fn surface(&self) -> Option<&SvgSurface> {
        self.surface.as_ref()
    }

    /// Serializes the surface and its attached paths as SVG markup
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        match &self.surface {
            Some(surface) => {
                let [x, y, w, h] = surface.view_box;
                let _ = write!(
                    out,
                    r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
                    surface.width, surface.height, x, y, w, h
                );
            }
            None => out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg">"#),
        }
        out.push_str("<g>");

        for element in self.elements() {
            let _ = write!(out, r#"<path d="{}""#, element.d);
            if !element.classes.is_empty() {
                let _ = write!(out, r#" class="{}""#, element.classes.join(" "));
            }
            for (name, value) in &element.attributes {
                let _ = write!(out, r#" {}="{}""#, name, escape_attribute(value));
            }
            out.push_str("/>");
        }

        out.push_str("</g></svg>");
        out
    }
}

impl RenderBackend for SvgBackend {
    const IMMEDIATE: bool = false;

    fn init_path(&mut self, id: PathId, path: &dyn VectorPath) {
        let mut element = SvgPathElement {
            id,
            d: String::from("M0 0"),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
        };
        apply_style(&mut element, path.style());
        self.elements.insert(id, element);
    }

    fn add_path(&mut self, id: PathId) {
        if self.elements.contains_key(&id) && !self.document.contains(&id) {
            self.document.push(id);
        }
    }

    fn remove_path(&mut self, id: PathId) {
        self.elements.remove(&id);
        self.document.retain(|other| *other != id);
    }

    fn update_style(&mut self, id: PathId, style: &PathStyle) {
        if let Some(element) = self.elements.get_mut(&id) {
            apply_style(element, style);
        }
    }

    fn bring_to_front(&mut self, id: PathId) {
        if let Some(pos) = self.document.iter().position(|other| *other == id) {
            let id = self.document.remove(pos);
            self.document.push(id);
        }
    }

    fn bring_to_back(&mut self, id: PathId) {
        if let Some(pos) = self.document.iter().position(|other| *other == id) {
            let id = self.document.remove(pos);
            self.document.insert(0, id);
        }
    }

    fn update_poly(&mut self, id: PathId, parts: &[Vec<Point>], closed: bool, _style: &PathStyle) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.d = points_to_path(parts, closed);
        }
    }

    fn update_circle(
        &mut self,
        id: PathId,
        center: Point,
        radius: f64,
        radius_y: f64,
        empty: bool,
        _style: &PathStyle,
    ) {
        if let Some(element) = self.elements.get_mut(&id) {
            element.d = circle_to_path(center, radius, radius_y, empty);
        }
    }

    fn update_surface(&mut self, bounds: &Bounds) {
        let size = bounds.size();
        self.surface = Some(SvgSurface {
            position: bounds.min,
            width: size.x,
            height: size.y,
            view_box: [bounds.min.x, bounds.min.y, size.x, size.y],
            transform: None,
        });
    }

    fn set_transform(&mut self, offset: Point, scale: f64) {
        if let Some(surface) = self.surface.as_mut() {
            surface.transform = Some((offset, scale));
        }
    }

    fn detach(&mut self) {
        self.surface = None;
    }
}

/// Path data for a set of rings: `M x yL x y...`, each closed with `z` if
/// `closed`; empty rings are skipped and `M0 0` stands for nothing to draw
pub fn points_to_path(parts: &[Vec<Point>], closed: bool) -> String {
    let mut d = String::new();
    for part in parts.iter().filter(|part| !part.is_empty()) {
        for (i, point) in part.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{}{} {}", command, num(point.x), num(point.y));
        }
        if closed {
            d.push('z');
        }
    }

    if d.is_empty() {
        d.push_str("M0 0");
    }
    d
}

/// Path data for a full ellipse drawn as two arcs
pub fn circle_to_path(center: Point, radius: f64, radius_y: f64, empty: bool) -> String {
    if empty {
        return String::from("M0 0");
    }

    let r = radius.round().max(1.0);
    let r2 = radius_y.round().max(1.0);
    let arc = format!("a{},{} 0 1,0 ", num(r), num(r2));
    format!(
        "M{},{}{}{},0 {}{},0 ",
        num(center.x - r),
        num(center.y),
        arc,
        num(r * 2.0),
        arc,
        num(-r * 2.0)
    )
}

fn apply_style(element: &mut SvgPathElement, style: &PathStyle) {
    let attributes = &mut element.attributes;
    attributes.clear();

    if style.stroke {
        attributes.insert("stroke".into(), style.color.to_hex());
        attributes.insert("stroke-opacity".into(), num(style.opacity).to_string());
        attributes.insert("stroke-width".into(), num(style.weight).to_string());
        attributes.insert("stroke-linecap".into(), style.line_cap.as_str().into());
        attributes.insert("stroke-linejoin".into(), style.line_join.as_str().into());
        if let Some(dash_array) = &style.dash_array {
            attributes.insert("stroke-dasharray".into(), dash_array.clone());
        }
        if let Some(dash_offset) = &style.dash_offset {
            attributes.insert("stroke-dashoffset".into(), dash_offset.clone());
        }
    } else {
        attributes.insert("stroke".into(), "none".into());
    }

    if style.fill {
        attributes.insert("fill".into(), style.effective_fill_color().to_hex());
        attributes.insert("fill-opacity".into(), num(style.fill_opacity).to_string());
        attributes.insert("fill-rule".into(), style.fill_rule.as_str().into());
    } else {
        attributes.insert("fill".into(), "none".into());
    }

    element.classes.clear();
    if let Some(class_name) = &style.class_name {
        element
            .classes
            .extend(class_name.split_whitespace().map(String::from));
    }
    if style.interactive {
        element.classes.push("leaflet-interactive".into());
    }
}

// Avoids "-0" in path data.
fn num(value: f64) -> f64 {
    value + 0.0
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::polyline::Polyline;
    use crate::rendering::arena::Arena;
    use crate::LatLng;

    #[test]
    fn test_points_to_path() {
        let parts = vec![
            vec![Point::new(0.0, 0.0), Point::new(10.5, 0.0), Point::new(10.0, 10.0)],
            vec![Point::new(-0.0, 1.0), Point::new(2.0, 3.0)],
        ];
        assert_eq!(points_to_path(&parts, false), "M0 0L10.5 0L10 10M0 1L2 3");
        assert_eq!(points_to_path(&parts, true), "M0 0L10.5 0L10 10zM0 1L2 3z");
        assert_eq!(points_to_path(&[], true), "M0 0");
    }

    #[test]
    fn test_points_to_path_skips_empty_rings() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ];
        assert_eq!(points_to_path(&[vec![]], true), "M0 0");
        assert_eq!(
            points_to_path(&[vec![], square.clone(), vec![]], true),
            "M0 0L4 0L4 4z"
        );
        assert_eq!(points_to_path(&[square, vec![]], false), "M0 0L4 0L4 4");
    }

    #[test]
    fn test_circle_path() {
        assert_eq!(
            circle_to_path(Point::new(50.0, 40.0), 10.0, 10.0, false),
            "M40,40a10,10 0 1,0 20,0 a10,10 0 1,0 -20,0 "
        );
        assert_eq!(
            circle_to_path(Point::new(50.0, 40.0), 0.3, 6.4, false),
            "M49,40a1,6 0 1,0 2,0 a1,6 0 1,0 -2,0 "
        );
        assert_eq!(circle_to_path(Point::new(50.0, 40.0), 10.0, 10.0, true), "M0 0");
    }

    #[test]
    fn test_style_attributes() {
        let mut svg = SvgBackend::new();
        let id = Arena::new().insert(());
        let line = Polyline::new(vec![LatLng::new(0.0, 0.0)]).with_style(PathStyle {
            class_name: Some("route main".into()),
            ..PathStyle::default().with_dash_array("5, 10")
        });
        svg.init_path(id, &line);

        let element = svg.element(id).unwrap();
        assert_eq!(element.attribute("stroke"), Some("#3388ff"));
        assert_eq!(element.attribute("stroke-width"), Some("3"));
        assert_eq!(element.attribute("stroke-dasharray"), Some("5, 10"));
        assert_eq!(element.attribute("fill"), Some("none"));
        assert_eq!(element.attribute("fill-opacity"), None);
        assert_eq!(element.classes, vec!["route", "main", "leaflet-interactive"]);

        let hidden = PathStyle {
            stroke: false,
            interactive: false,
            ..PathStyle::filled()
        };
        svg.update_style(id, &hidden);
        let element = svg.element(id).unwrap();
        assert_eq!(element.attribute("stroke"), Some("none"));
        assert_eq!(element.attribute("stroke-dasharray"), None);
        assert_eq!(element.attribute("fill"), Some("#3388ff"));
        assert_eq!(element.attribute("fill-rule"), Some("evenodd"));
        assert!(element.classes.is_empty());
    }

    #[test]
    fn test_document_order() {
        let mut arena = Arena::new();
        let mut svg = SvgBackend::new();
        let line = Polyline::new(vec![]);
        let ids: Vec<PathId> = (0..3).map(|_| arena.insert(())).collect();
        for id in &ids {
            svg.init_path(*id, &line);
            svg.add_path(*id);
        }

        svg.bring_to_back(ids[2]);
        assert_eq!(svg.document_order(), &[ids[2], ids[0], ids[1]]);
        svg.bring_to_front(ids[2]);
        assert_eq!(svg.document_order(), &[ids[0], ids[1], ids[2]]);

        svg.remove_path(ids[1]);
        assert_eq!(svg.document_order(), &[ids[0], ids[2]]);
        assert!(svg.element(ids[1]).is_none());
    }

    #[test]
    fn test_surface_markup() {
        let mut svg = SvgBackend::new();
        svg.update_surface(&Bounds::from_coords(-80.0, -60.0, 880.0, 660.0));
        let surface = svg.surface().unwrap();
        assert_eq!(surface.view_box, [-80.0, -60.0, 960.0, 720.0]);
        assert!(svg
            .to_svg_string()
            .starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="960" height="720" viewBox="-80 -60 960 720">"#));
    }
}
