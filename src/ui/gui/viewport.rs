//! Zoom and pan math for the map panel.
//!
//! All positions are relative to the viewport's top-left corner. Image
//! coordinates are in source pixels.

use eframe::egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 10.0;
/// Zoom applied when centering on a clicked row
pub const SELECT_SCALE: f32 = 2.0;
/// Fit leaves a 10% border
pub const FIT_FACTOR: f32 = 0.9;
/// Keep a centered marker at least this far from the viewport edge
pub const CENTER_MARGIN: f32 = 50.0;

const BASE_ZOOM_STEP: f32 = 0.1;

/// Zoom-in increment: finer when zoomed out, growing with the square above 100%
pub fn zoom_in_step(scale: f32) -> f32 {
    if scale < 0.5 {
        0.05
    } else if scale < 1.0 {
        BASE_ZOOM_STEP
    } else {
        BASE_ZOOM_STEP * scale * scale
    }
}

pub fn zoom_out_step(scale: f32) -> f32 {
    if scale > 5.0 {
        scale * 0.25
    } else if scale > 2.0 {
        scale * 0.2
    } else if scale > 0.5 {
        BASE_ZOOM_STEP
    } else {
        0.05
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl MapViewport {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn zoom_percent(&self) -> u32 {
        (self.scale * 100.0) as u32
    }

    pub fn zoom_in(&mut self) {
        if self.scale < MAX_SCALE {
            self.scale = (self.scale + zoom_in_step(self.scale)).min(MAX_SCALE);
        }
    }

    pub fn zoom_out(&mut self) {
        if self.scale > MIN_SCALE {
            self.scale = (self.scale - zoom_out_step(self.scale)).max(MIN_SCALE);
        }
    }

    pub fn set_zoom(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Scale so the whole image fits, centered
    pub fn fit(&mut self, view: Vec2, image: Vec2) {
        if image.x <= 0.0 || image.y <= 0.0 {
            return;
        }
        self.scale = (view.x / image.x).min(view.y / image.y) * FIT_FACTOR;
        self.offset = Vec2::ZERO;
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Top-left of the scaled image
    pub fn image_origin(&self, view: Vec2, image: Vec2) -> Pos2 {
        let scaled = image * self.scale;
        Pos2::new(
            (view.x - scaled.x) / 2.0 + self.offset.x,
            (view.y - scaled.y) / 2.0 + self.offset.y,
        )
    }

    pub fn image_to_view(&self, view: Vec2, image: Vec2, p: Pos2) -> Pos2 {
        self.image_origin(view, image) + p.to_vec2() * self.scale
    }

    pub fn view_to_image(&self, view: Vec2, image: Vec2, p: Pos2) -> Pos2 {
        let origin = self.image_origin(view, image);
        Pos2::new((p.x - origin.x) / self.scale, (p.y - origin.y) / self.scale)
    }

    /// Wheel zoom that keeps the image point under `cursor` fixed
    pub fn zoom_at(&mut self, view: Vec2, cursor: Pos2, zoom_in: bool) {
        let old = self.scale;
        if zoom_in {
            self.zoom_in();
        } else {
            self.zoom_out();
        }
        if self.scale == old {
            return;
        }
        let center = Pos2::new(view.x / 2.0 + self.offset.x, view.y / 2.0 + self.offset.y);
        let rel = cursor - center;
        self.offset -= rel * (self.scale / old - 1.0);
    }

    /// Put an image point at the viewport center, then keep it inside the margin
    pub fn center_on(&mut self, view: Vec2, image: Vec2, p: Pos2) {
        self.offset = Vec2::ZERO;
        let at = self.image_to_view(view, image, p);
        self.offset = Vec2::new(view.x / 2.0 - at.x, view.y / 2.0 - at.y);

        let at = at + self.offset;
        if at.x < CENTER_MARGIN {
            self.offset.x += CENTER_MARGIN - at.x;
        } else if at.x > view.x - CENTER_MARGIN {
            self.offset.x -= at.x - (view.x - CENTER_MARGIN);
        }
        if at.y < CENTER_MARGIN {
            self.offset.y += CENTER_MARGIN - at.y;
        } else if at.y > view.y - CENTER_MARGIN {
            self.offset.y -= at.y - (view.y - CENTER_MARGIN);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_zoom_steps() {
        assert!(approx(zoom_in_step(0.3), 0.05));
        assert!(approx(zoom_in_step(0.7), 0.1));
        assert!(approx(zoom_in_step(2.0), 0.4));

        assert!(approx(zoom_out_step(6.0), 1.5));
        assert!(approx(zoom_out_step(3.0), 0.6));
        assert!(approx(zoom_out_step(1.0), 0.1));
        assert!(approx(zoom_out_step(0.4), 0.05));
    }

    #[test]
    fn test_zoom_clamps() {
        let mut vp = MapViewport { scale: 9.5, ..Default::default() };
        vp.zoom_in();
        assert_eq!(vp.scale, MAX_SCALE);
        vp.zoom_in();
        assert_eq!(vp.scale, MAX_SCALE);

        let mut vp = MapViewport { scale: 0.12, ..Default::default() };
        vp.zoom_out();
        assert_eq!(vp.scale, MIN_SCALE);

        vp.set_zoom(42.0);
        assert_eq!(vp.scale, MAX_SCALE);
        vp.set_zoom(0.0);
        assert_eq!(vp.scale, MIN_SCALE);
    }

    #[test]
    fn test_fit_and_reset() {
        let mut vp = MapViewport::default();
        vp.pan(Vec2::new(30.0, -10.0));
        vp.fit(Vec2::new(800.0, 600.0), Vec2::new(1600.0, 600.0));
        assert!(approx(vp.scale, 0.45));
        assert_eq!(vp.offset, Vec2::ZERO);

        vp.pan(Vec2::new(5.0, 5.0));
        vp.reset();
        assert_eq!(vp, MapViewport::default());
        assert_eq!(vp.zoom_percent(), 100);
    }

    #[test]
    fn test_image_placement() {
        let vp = MapViewport { scale: 2.0, offset: Vec2::new(10.0, 0.0) };
        let origin = vp.image_origin(Vec2::new(400.0, 300.0), Vec2::new(100.0, 100.0));
        assert_eq!(origin, Pos2::new(110.0, 50.0));

        let p = vp.image_to_view(Vec2::new(400.0, 300.0), Vec2::new(100.0, 100.0), Pos2::new(5.0, 5.0));
        assert_eq!(p, Pos2::new(120.0, 60.0));
        let back = vp.view_to_image(Vec2::new(400.0, 300.0), Vec2::new(100.0, 100.0), p);
        assert_eq!(back, Pos2::new(5.0, 5.0));
    }

    #[test]
    fn test_wheel_zoom_keeps_point_under_cursor() {
        let view = Vec2::new(800.0, 600.0);
        let image = Vec2::new(1000.0, 1000.0);
        let mut vp = MapViewport { scale: 1.5, offset: Vec2::new(-40.0, 25.0) };
        let cursor = Pos2::new(620.0, 140.0);

        let before = vp.view_to_image(view, image, cursor);
        vp.zoom_at(view, cursor, true);
        assert!(vp.scale > 1.5);
        let after = vp.view_to_image(view, image, cursor);
        assert!((before - after).length() < 1e-2, "{:?} vs {:?}", before, after);
    }

    #[test]
    fn test_center_on_point() {
        let view = Vec2::new(800.0, 600.0);
        let image = Vec2::new(2000.0, 1500.0);
        let mut vp = MapViewport { scale: SELECT_SCALE, offset: Vec2::new(99.0, 99.0) };
        let marker = Pos2::new(1500.0, 200.0);

        vp.center_on(view, image, marker);
        let at = vp.image_to_view(view, image, marker);
        assert!(approx(at.x, 400.0));
        assert!(approx(at.y, 300.0));
    }

    #[test]
    fn test_center_respects_margin_in_small_view() {
        let view = Vec2::new(60.0, 60.0);
        let image = Vec2::new(100.0, 100.0);
        let mut vp = MapViewport::default();
        vp.center_on(view, image, Pos2::new(10.0, 10.0));
        let at = vp.image_to_view(view, image, Pos2::new(10.0, 10.0));
        // The center (30) lies inside the left margin band
        assert!(approx(at.x, CENTER_MARGIN));
        assert!(approx(at.y, CENTER_MARGIN));
    }
}
