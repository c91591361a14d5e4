//! World-to-canvas coordinate mapping.
//!
//! World points are feet on a fixed-size drawing sheet. Canvas points are
//! drawing-surface pixels. The mapping first centres the sheet inside the
//! surface at `output_scale * zoom` pixels per foot, then applies the pan.
//! Every component that converts between the two spaces goes through this
//! module.

use crate::config::EditorConfig;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The user-controlled part of the mapping: pan (canvas px) and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Translation applied after centring, in canvas pixels.
    pub pan: Vec2,
    /// Multiplicative zoom on top of the output scale.
    pub zoom: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl View {
    /// Create a view with the given pan and zoom.
    pub fn new(pan: Vec2, zoom: f64) -> Self {
        Self { pan, zoom }
    }

    /// Pan by a delta in canvas pixels.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

/// Canvas position of the sheet's top-left corner.
fn sheet_origin(view: &View, scale: f64, surface_size: Size, sheet_size: Size) -> Point {
    Point::new(
        (surface_size.width - sheet_size.width * scale) / 2.0 + view.pan.x,
        (surface_size.height - sheet_size.height * scale) / 2.0 + view.pan.y,
    )
}

/// Map a world point (ft) to canvas pixels.
pub fn world_to_canvas(
    point: Point,
    view: &View,
    output_scale: f64,
    surface_size: Size,
    sheet_size: Size,
) -> Point {
    let scale = output_scale * view.zoom;
    let origin = sheet_origin(view, scale, surface_size, sheet_size);
    Point::new(origin.x + point.x * scale, origin.y + point.y * scale)
}

/// Map canvas pixels back to a world point (ft). Exact inverse of
/// [`world_to_canvas`].
pub fn canvas_to_world(
    point: Point,
    view: &View,
    output_scale: f64,
    surface_size: Size,
    sheet_size: Size,
) -> Point {
    let scale = output_scale * view.zoom;
    let origin = sheet_origin(view, scale, surface_size, sheet_size);
    Point::new((point.x - origin.x) / scale, (point.y - origin.y) / scale)
}

/// A complete coordinate mapping: view, output scale, surface and sheet size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub view: View,
    /// Pixels per foot at zoom 1.0.
    pub output_scale: f64,
    /// Size of the drawing surface in pixels.
    pub surface_size: Size,
    /// Size of the drawing sheet in feet.
    pub sheet_size: Size,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    /// Build a viewport from configuration for a surface of the given size.
    pub fn from_config(config: &EditorConfig, surface_size: Size) -> Self {
        Self {
            view: View::default(),
            output_scale: config.output_scale(),
            surface_size,
            sheet_size: config.sheet_size(),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
        }
    }

    /// Effective pixels per foot including zoom.
    pub fn pixels_per_foot(&self) -> f64 {
        self.output_scale * self.view.zoom
    }

    /// Affine transform from world to canvas, for renderers.
    pub fn transform(&self) -> Affine {
        let scale = self.pixels_per_foot();
        let origin = sheet_origin(&self.view, scale, self.surface_size, self.sheet_size);
        Affine::translate(origin.to_vec2()) * Affine::scale(scale)
    }

    pub fn world_to_canvas(&self, point: Point) -> Point {
        world_to_canvas(point, &self.view, self.output_scale, self.surface_size, self.sheet_size)
    }

    pub fn canvas_to_world(&self, point: Point) -> Point {
        canvas_to_world(point, &self.view, self.output_scale, self.surface_size, self.sheet_size)
    }

    /// Convert a canvas distance in pixels to feet.
    pub fn canvas_to_world_distance(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_foot()
    }

    /// Convert a world distance in feet to pixels.
    pub fn world_to_canvas_distance(&self, feet: f64) -> f64 {
        feet * self.pixels_per_foot()
    }

    /// Resize the drawing surface (window resize or DPI change).
    pub fn set_surface_size(&mut self, surface_size: Size) {
        self.surface_size = surface_size;
    }

    /// Pan by a delta in canvas pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.view.pan_by(delta);
    }

    /// Zoom by `factor`, keeping the given canvas point fixed.
    pub fn zoom_at(&mut self, canvas_point: Point, factor: f64) {
        let new_zoom = (self.view.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.view.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.canvas_to_world(canvas_point);
        self.view.zoom = new_zoom;

        let moved = self.world_to_canvas(world_point);
        self.view.pan += canvas_point - moved;
    }

    /// Reset to the centred, unzoomed sheet.
    pub fn reset(&mut self) {
        self.view = View::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn viewport() -> Viewport {
        Viewport::from_config(&EditorConfig::default(), Size::new(1200.0, 900.0))
    }

    #[test]
    fn test_sheet_is_centred() {
        let vp = viewport();
        let centre_world = Point::new(vp.sheet_size.width / 2.0, vp.sheet_size.height / 2.0);
        let centre_canvas = vp.world_to_canvas(centre_world);
        assert!((centre_canvas.x - 600.0).abs() < 1e-9);
        assert!((centre_canvas.y - 450.0).abs() < 1e-9);
    }

    #[test]
    fn test_pan_is_additive_in_pixels() {
        let mut vp = viewport();
        let before = vp.world_to_canvas(Point::new(10.0, 10.0));
        vp.pan(Vec2::new(25.0, -40.0));
        let after = vp.world_to_canvas(Point::new(10.0, 10.0));
        assert!((after.x - before.x - 25.0).abs() < 1e-9);
        assert!((after.y - before.y + 40.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_canvas_roundtrip(
            x in -1e4f64..1e4,
            y in -1e4f64..1e4,
            pan_x in -2000.0f64..2000.0,
            pan_y in -2000.0f64..2000.0,
            zoom in 0.1f64..10.0,
            scale in 1.0f64..100.0,
            surface_w in 100.0f64..4000.0,
            surface_h in 100.0f64..4000.0,
        ) {
            let sheet = Size::new(100.0, 70.0);
            let surface = Size::new(surface_w, surface_h);
            let view = View::new(Vec2::new(pan_x, pan_y), zoom);
            let p = Point::new(x, y);

            let canvas = world_to_canvas(p, &view, scale, surface, sheet);
            let back = canvas_to_world(canvas, &view, scale, surface, sheet);
            prop_assert!((back - p).hypot() < 1e-6, "{p:?} came back as {back:?}");
        }
    }

    #[test]
    fn test_affine_matches_function() {
        let mut vp = viewport();
        vp.view = View::new(Vec2::new(17.0, 3.0), 2.5);
        let p = Point::new(33.0, 12.5);
        let a = vp.transform() * p;
        let b = vp.world_to_canvas(p);
        assert!((a - b).hypot() < 1e-9);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = viewport();
        let anchor = Point::new(300.0, 200.0);
        let world_before = vp.canvas_to_world(anchor);
        vp.zoom_at(anchor, 2.0);
        let world_after = vp.canvas_to_world(anchor);
        assert!((vp.view.zoom - 2.0).abs() < f64::EPSILON);
        assert!((world_before - world_after).hypot() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut vp = viewport();
        vp.zoom_at(Point::ZERO, 0.001);
        assert!((vp.view.zoom - vp.min_zoom).abs() < f64::EPSILON);

        vp.zoom_at(Point::ZERO, 1e6);
        assert!((vp.view.zoom - vp.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_conversion() {
        let mut vp = viewport();
        vp.view.zoom = 2.0;
        let px = vp.world_to_canvas_distance(3.0);
        assert!((vp.canvas_to_world_distance(px) - 3.0).abs() < 1e-12);
        assert!((px - 3.0 * vp.output_scale * 2.0).abs() < 1e-12);
    }
}
