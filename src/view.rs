use eframe::egui;

use crate::model::CellPos;

pub const DEFAULT_MIN_SCALE: f32 = 0.1;
pub const DEFAULT_MAX_SCALE: f32 = 5.0;

pub fn rotate_vec2(v: egui::Vec2, angle: f32) -> egui::Vec2 {
    let sin = angle.sin();
    let cos = angle.cos();
    egui::vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Viewport <-> logical grid mapping: scale, then pan, then rotation about
/// the logical origin.
///
/// Rotation only affects [`ViewTransform::project`], which the renderer uses.
/// Pointer mapping through [`ViewTransform::to_grid`] ignores it, so clicks
/// always target unrotated grid space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pan: egui::Vec2,
    scale: f32,
    rotation_degrees: f32,
    min_scale: f32,
    max_scale: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
    }
}

impl ViewTransform {
    pub fn with_limits(min_scale: f32, max_scale: f32) -> Self {
        let min_scale = min_scale.max(f32::EPSILON);
        let max_scale = max_scale.max(min_scale);
        Self {
            pan: egui::Vec2::ZERO,
            scale: 1.0f32.clamp(min_scale, max_scale),
            rotation_degrees: 0.0,
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[cfg(test)]
    pub fn pan(&self) -> egui::Vec2 {
        self.pan
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn to_grid(&self, viewport: egui::Pos2) -> egui::Pos2 {
        ((viewport.to_vec2() - self.pan) / self.scale).to_pos2()
    }

    pub fn to_viewport(&self, grid: egui::Pos2) -> egui::Pos2 {
        (grid.to_vec2() * self.scale + self.pan).to_pos2()
    }

    /// Where a logical point ends up on screen once rotation is applied.
    pub fn project(&self, grid: egui::Pos2) -> egui::Pos2 {
        let rotated = rotate_vec2(grid.to_vec2(), self.rotation_degrees.to_radians());
        (rotated * self.scale + self.pan).to_pos2()
    }

    pub fn cell_at(&self, viewport: egui::Pos2, cell_size: u32) -> CellPos {
        CellPos::containing(self.to_grid(viewport), cell_size)
    }

    pub fn zoom_at(&mut self, anchor: egui::Pos2, factor: f32) {
        let before = self.to_grid(anchor);
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        let after = self.to_viewport(before);
        self.pan += anchor - after;
    }

    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.pan += delta;
    }

    pub fn rotate_by(&mut self, delta_degrees: f32) {
        let mut r = (self.rotation_degrees + delta_degrees).rem_euclid(360.0);
        // rem_euclid rounds tiny negative inputs up to exactly 360.0
        if r >= 360.0 {
            r = 0.0;
        }
        self.rotation_degrees = r;
    }

    /// Centre `content` (logical size) along each axis where it fits in the
    /// viewport; pin it to the left/top edge where it does not.
    pub fn center_content(&mut self, viewport: egui::Vec2, content: egui::Vec2) {
        let scaled = content * self.scale;
        let axis = |view: f32, content: f32| {
            if content < view {
                (view - content) * 0.5
            } else {
                0.0
            }
        };
        self.pan = egui::vec2(axis(viewport.x, scaled.x), axis(viewport.y, scaled.y));
    }

    pub fn reset(&mut self) {
        *self = Self::with_limits(self.min_scale, self.max_scale);
    }
}

/// Two-finger pinch: zoom about the midpoint, rotate by the change in finger
/// angle, pan by the midpoint's movement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PinchGesture {
    last_distance: Option<f32>,
    last_angle: Option<f32>,
    last_center: Option<egui::Pos2>,
}

impl PinchGesture {
    pub fn is_active(&self) -> bool {
        self.last_center.is_some()
    }

    /// Feed one sample of the two touch points (surface-local).
    pub fn update(&mut self, view: &mut ViewTransform, a: egui::Pos2, b: egui::Pos2) {
        let d = a - b;
        let distance = d.length();
        let angle = d.y.atan2(d.x).to_degrees();
        let center = a + (b - a) * 0.5;

        if let Some(last) = self.last_center {
            view.pan_by(center - last);
        }
        if let Some(last) = self.last_distance {
            if last > f32::EPSILON && distance > f32::EPSILON {
                view.zoom_at(center, distance / last);
            }
        }
        if let Some(last) = self.last_angle {
            // atan2 wraps at ±180; take the short way round
            let delta = (angle - last + 180.0).rem_euclid(360.0) - 180.0;
            view.rotate_by(delta);
        }

        self.last_distance = Some(distance);
        self.last_angle = Some(angle);
        self.last_center = Some(center);
    }

    pub fn end(&mut self) {
        *self = Self::default();
    }
}

/// Middle-button drag panning.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragPan {
    last: Option<egui::Pos2>,
}

impl DragPan {
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    pub fn begin(&mut self, pos: egui::Pos2) {
        self.last = Some(pos);
    }

    pub fn update(&mut self, view: &mut ViewTransform, pos: egui::Pos2) {
        if let Some(last) = self.last {
            view.pan_by(pos - last);
            self.last = Some(pos);
        }
    }

    pub fn end(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn view(pan: egui::Vec2, scale: f32) -> ViewTransform {
        ViewTransform {
            pan,
            scale,
            ..ViewTransform::default()
        }
    }

    proptest! {
        #[test]
        fn grid_viewport_round_trip(
            pan_x in -2000.0f32..2000.0,
            pan_y in -2000.0f32..2000.0,
            scale in 0.1f32..5.0,
            gx in -1000.0f32..1000.0,
            gy in -1000.0f32..1000.0,
        ) {
            let v = view(egui::vec2(pan_x, pan_y), scale);
            let back = v.to_grid(v.to_viewport(egui::pos2(gx, gy)));
            prop_assert!((back.x - gx).abs() <= 1e-2);
            prop_assert!((back.y - gy).abs() <= 1e-2);
        }

        #[test]
        fn zoom_keeps_anchor_fixed(
            pan_x in -500.0f32..500.0,
            pan_y in -500.0f32..500.0,
            scale in 0.1f32..5.0,
            ax in 0.0f32..1600.0,
            ay in 0.0f32..1200.0,
            factor in 0.05f32..20.0,
        ) {
            let mut v = view(egui::vec2(pan_x, pan_y), scale);
            let anchor = egui::pos2(ax, ay);
            let world = v.to_grid(anchor);
            v.zoom_at(anchor, factor);
            let again = v.to_viewport(world);
            prop_assert!((again.x - ax).abs() <= 1e-1);
            prop_assert!((again.y - ay).abs() <= 1e-1);
            prop_assert!(v.scale() >= DEFAULT_MIN_SCALE && v.scale() <= DEFAULT_MAX_SCALE);
        }
    }

    #[test]
    fn to_grid_ignores_rotation() {
        let mut v = ViewTransform::default();
        v.pan_by(egui::vec2(10.0, 20.0));
        v.rotate_by(90.0);
        let g = v.to_grid(egui::pos2(42.0, 52.0));
        assert_relative_eq!(g.x, 32.0);
        assert_relative_eq!(g.y, 32.0);
    }

    #[test]
    fn project_rotates_about_logical_origin() {
        let mut v = ViewTransform::default();
        v.zoom_at(egui::Pos2::ZERO, 2.0);
        v.pan_by(egui::vec2(100.0, 0.0));
        v.rotate_by(90.0);
        let p = v.project(egui::pos2(10.0, 0.0));
        assert_relative_eq!(p.x, 100.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 20.0, epsilon = 1e-4);
    }

    #[test]
    fn scale_is_clamped() {
        let mut v = ViewTransform::default();
        v.zoom_at(egui::pos2(5.0, 5.0), 100.0);
        assert_relative_eq!(v.scale(), DEFAULT_MAX_SCALE);
        v.zoom_at(egui::pos2(5.0, 5.0), 0.0001);
        assert_relative_eq!(v.scale(), DEFAULT_MIN_SCALE);
    }

    #[test]
    fn rotation_is_normalised() {
        let mut v = ViewTransform::default();
        v.rotate_by(-30.0);
        assert_relative_eq!(v.rotation_degrees(), 330.0);
        v.rotate_by(400.0);
        assert_relative_eq!(v.rotation_degrees(), 10.0, epsilon = 1e-3);
        v.rotate_by(-10.0);
        assert!(v.rotation_degrees() >= 0.0 && v.rotation_degrees() < 360.0);
    }

    #[test]
    fn pan_is_unbounded_and_additive() {
        let mut v = ViewTransform::default();
        v.pan_by(egui::vec2(1e6, -1e6));
        v.pan_by(egui::vec2(1.0, 1.0));
        assert_eq!(v.pan(), egui::vec2(1e6 + 1.0, -1e6 + 1.0));
    }

    #[test]
    fn center_content_only_when_it_fits() {
        let mut v = ViewTransform::default();
        v.center_content(egui::vec2(1000.0, 300.0), egui::vec2(800.0, 800.0));
        assert_eq!(v.pan(), egui::vec2(100.0, 0.0));
    }

    #[test]
    fn pinch_zooms_about_midpoint() {
        let mut v = ViewTransform::default();
        let mut pinch = PinchGesture::default();
        pinch.update(&mut v, egui::pos2(90.0, 100.0), egui::pos2(110.0, 100.0));
        assert_eq!(v, ViewTransform::default());
        let mid = egui::pos2(100.0, 100.0);
        let world = v.to_grid(mid);
        pinch.update(&mut v, egui::pos2(80.0, 100.0), egui::pos2(120.0, 100.0));
        assert_relative_eq!(v.scale(), 2.0);
        let again = v.to_viewport(world);
        assert_relative_eq!(again.x, mid.x, epsilon = 1e-3);
        assert_relative_eq!(again.y, mid.y, epsilon = 1e-3);
    }

    #[test]
    fn pinch_rotates_the_short_way() {
        let mut v = ViewTransform::default();
        let mut pinch = PinchGesture::default();
        // finger angle just below +180, then just above -180
        pinch.update(&mut v, egui::pos2(0.0, 0.5), egui::pos2(10.0, 0.0));
        pinch.update(&mut v, egui::pos2(0.0, -0.5), egui::pos2(10.0, 0.0));
        let r = v.rotation_degrees();
        assert!(r < 10.0 || r > 350.0, "rotated by {r}");
    }

    #[test]
    fn pinch_end_forgets_last_sample() {
        let mut v = ViewTransform::default();
        let mut pinch = PinchGesture::default();
        pinch.update(&mut v, egui::pos2(0.0, 0.0), egui::pos2(10.0, 0.0));
        pinch.end();
        assert!(!pinch.is_active());
        let before = v;
        // far away and much wider: no delta without a prior sample
        pinch.update(&mut v, egui::pos2(500.0, 500.0), egui::pos2(900.0, 700.0));
        assert_eq!(v, before);
    }

    #[test]
    fn drag_pan_follows_pointer_until_end() {
        let mut v = ViewTransform::default();
        let mut drag = DragPan::default();
        drag.update(&mut v, egui::pos2(50.0, 50.0));
        assert_eq!(v.pan(), egui::Vec2::ZERO);
        drag.begin(egui::pos2(10.0, 10.0));
        drag.update(&mut v, egui::pos2(15.0, 30.0));
        drag.update(&mut v, egui::pos2(20.0, 30.0));
        assert_eq!(v.pan(), egui::vec2(10.0, 20.0));
        drag.end();
        drag.update(&mut v, egui::pos2(100.0, 100.0));
        assert_eq!(v.pan(), egui::vec2(10.0, 20.0));
    }
}
