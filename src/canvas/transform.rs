//! Canvas transform state machine
//!
//! Two pointer states, `Idle` and `Panning`, plus an independent zoom scalar.
//! The affine map is `screen = world * scale + translation`.

use super::Point;
use crate::config::CanvasConfig;
use rand::Rng;
use std::f64::consts::TAU;
use tracing::{debug, warn};

/// Pointer state of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    /// Drag over empty canvas in progress
    Panning {
        pointer_start: Point,
        translation_start: Point,
    },
}

/// Pan/zoom state of the view
#[derive(Debug, Clone)]
pub struct CanvasTransform {
    translation: Point,
    scale: f64,
    pan: PanState,
    config: CanvasConfig,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl CanvasTransform {
    /// Build a transform at scale 1. An invalid config (non-positive grid,
    /// inverted scale range or placement band) is replaced by the defaults.
    pub fn new(config: CanvasConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("{}, using default canvas settings", err);
                CanvasConfig::default()
            }
        };
        CanvasTransform {
            translation: Point::ORIGIN,
            scale: 1.0,
            pan: PanState::Idle,
            config,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.pan, PanState::Panning { .. })
    }

    /// `world = (screen - translation) / scale`
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translation.x) / self.scale,
            (screen.y - self.translation.y) / self.scale,
        )
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        world * self.scale + self.translation
    }

    /// Start panning unless the pointer went down over a node.
    /// Returns true when a pan started.
    pub fn pointer_down(&mut self, screen: Point, over_node: bool) -> bool {
        if over_node {
            return false;
        }
        self.pan = PanState::Panning {
            pointer_start: screen,
            translation_start: self.translation,
        };
        true
    }

    /// While panning, translation follows the cumulative delta from the
    /// drag start. Returns true when the view moved.
    pub fn pointer_move(&mut self, screen: Point) -> bool {
        let PanState::Panning {
            pointer_start,
            translation_start,
        } = self.pan
        else {
            return false;
        };
        self.translation = translation_start + (screen - pointer_start);
        true
    }

    /// Back to `Idle`. Returns true if a pan was active.
    pub fn pointer_up(&mut self) -> bool {
        let was_panning = self.is_panning();
        self.pan = PanState::Idle;
        was_panning
    }

    /// One wheel notch anchored at `anchor` (screen space).
    /// Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, anchor: Point, delta_y: f64) -> bool {
        let step = if delta_y > 0.0 {
            -self.config.wheel_step
        } else {
            self.config.wheel_step
        };
        self.zoom_at(anchor, self.scale + step)
    }

    /// Set the scale (clamped) keeping the world point under `anchor` fixed
    /// on screen. Returns false when the clamped scale did not change.
    pub fn zoom_at(&mut self, anchor: Point, scale: f64) -> bool {
        let scale = scale.clamp(self.config.min_scale, self.config.max_scale);
        if scale == self.scale {
            return false;
        }

        let world = self.screen_to_world(anchor);
        self.scale = scale;
        self.translation = anchor - world * scale;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(self.viewport_center(), self.scale + self.config.button_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(self.viewport_center(), self.scale - self.config.button_step)
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.zoom_at(self.viewport_center(), 1.0)
    }

    /// Identity transform
    pub fn center_view(&mut self) {
        self.translation = Point::ORIGIN;
        self.scale = 1.0;
        debug!("Canvas view reset to origin");
    }

    /// Pan so that `world` sits in the middle of the viewport
    pub fn move_to(&mut self, world: Point) {
        self.translation = self.viewport_center() - world * self.scale;
    }

    pub fn viewport_center(&self) -> Point {
        Point::new(
            self.config.viewport_width / 2.0,
            self.config.viewport_height / 2.0,
        )
    }

    /// Round each coordinate to the nearest multiple of the grid size
    pub fn snap_to_grid(&self, point: Point) -> Point {
        let grid = self.config.grid_size;
        Point::new(
            (point.x / grid).round() * grid,
            (point.y / grid).round() * grid,
        )
    }

    /// Random position in the placement band around `center`, snapped.
    ///
    /// Keeps new nodes off the center node; overlap between regular nodes
    /// is possible.
    pub fn random_placement<R: Rng + ?Sized>(&self, rng: &mut R, center: Point) -> Point {
        let angle = rng.gen::<f64>() * TAU;
        let band = self.config.placement_radius_max - self.config.placement_radius_min;
        let radius = self.config.placement_radius_min + rng.gen::<f64>() * band;

        let offset = Point::new(angle.cos() * radius, angle.sin() * radius);
        self.snap_to_grid(center + offset)
    }

    /// Snapped point on a circle around the world origin
    pub fn position_on_circle<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        radius: f64,
        angle: Option<f64>,
    ) -> Point {
        let angle = angle.unwrap_or_else(|| rng.gen::<f64>() * TAU);
        self.snap_to_grid(Point::new(angle.cos() * radius, angle.sin() * radius))
    }

    /// Grid line opacity for the current zoom level
    pub fn grid_opacity(&self) -> f64 {
        if self.scale < 0.5 {
            0.1
        } else if self.scale < 1.0 {
            0.3
        } else {
            0.5
        }
    }

    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    /// Coordinates shown in the position indicator
    pub fn position_indicator(&self) -> (i64, i64) {
        (
            (-self.translation.x).round() as i64,
            (-self.translation.y).round() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9, "{:?} != {:?}", a, b);
        assert!((a.y - b.y).abs() < 1e-9, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity_mapping() {
        let canvas = CanvasTransform::default();
        let p = Point::new(12.5, -3.0);
        assert_eq!(canvas.screen_to_world(p), p);
        assert_eq!(canvas.world_to_screen(p), p);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = CanvasConfig {
            grid_size: 0.0,
            ..Default::default()
        };
        let canvas = CanvasTransform::new(config);
        assert_eq!(canvas.config(), &CanvasConfig::default());

        let snapped = canvas.snap_to_grid(Point::new(37.0, -12.0));
        assert_eq!(snapped, Point::new(50.0, 0.0));

        let mut rng = StdRng::seed_from_u64(3);
        let placed = canvas.random_placement(&mut rng, Point::ORIGIN);
        assert!(placed.x.is_finite() && placed.y.is_finite());
    }

    #[test]
    fn test_pan_cycle() {
        let mut canvas = CanvasTransform::default();
        assert!(!canvas.pointer_move(Point::new(10.0, 10.0)));

        assert!(canvas.pointer_down(Point::new(100.0, 100.0), false));
        assert!(canvas.is_panning());
        assert!(canvas.pointer_move(Point::new(130.0, 90.0)));
        assert_eq!(canvas.translation(), Point::new(30.0, -10.0));
        // cumulative from the drag start, not incremental
        assert!(canvas.pointer_move(Point::new(150.0, 100.0)));
        assert_eq!(canvas.translation(), Point::new(50.0, 0.0));

        assert!(canvas.pointer_up());
        assert_eq!(canvas.pan_state(), PanState::Idle);
        assert!(!canvas.pointer_up());
        assert!(!canvas.pointer_move(Point::new(0.0, 0.0)));
        assert_eq!(canvas.translation(), Point::new(50.0, 0.0));
    }

    #[test]
    fn test_pointer_down_over_node_does_not_pan() {
        let mut canvas = CanvasTransform::default();
        assert!(!canvas.pointer_down(Point::new(5.0, 5.0), true));
        assert!(!canvas.is_panning());
    }

    #[test]
    fn test_screen_world_roundtrip_after_pan_and_zoom() {
        let mut canvas = CanvasTransform::default();
        canvas.pointer_down(Point::new(0.0, 0.0), false);
        canvas.pointer_move(Point::new(40.0, 25.0));
        canvas.pointer_up();
        canvas.wheel(Point::new(300.0, 200.0), -1.0);

        let world = Point::new(-120.0, 75.0);
        assert_close(canvas.screen_to_world(canvas.world_to_screen(world)), world);
    }

    #[test]
    fn test_wheel_zoom_keeps_anchor_fixed() {
        let mut canvas = CanvasTransform::default();
        canvas.pointer_down(Point::new(0.0, 0.0), false);
        canvas.pointer_move(Point::new(-35.0, 60.0));
        canvas.pointer_up();

        let anchor = Point::new(412.0, 233.0);
        for delta in [-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0] {
            let before = canvas.screen_to_world(anchor);
            canvas.wheel(anchor, delta);
            assert_close(canvas.screen_to_world(anchor), before);
        }
    }

    #[test]
    fn test_wheel_direction_and_clamp() {
        let mut canvas = CanvasTransform::default();
        let anchor = Point::new(0.0, 0.0);
        assert!(canvas.wheel(anchor, -100.0));
        assert!((canvas.scale() - 1.1).abs() < 1e-9);
        assert!(canvas.wheel(anchor, 100.0));
        assert!((canvas.scale() - 1.0).abs() < 1e-9);

        for _ in 0..100 {
            canvas.wheel(anchor, 1.0);
        }
        assert_eq!(canvas.scale(), canvas.config().min_scale);
        assert!(!canvas.wheel(anchor, 1.0));

        for _ in 0..100 {
            canvas.wheel(anchor, -1.0);
        }
        assert_eq!(canvas.scale(), canvas.config().max_scale);
        assert!(!canvas.zoom_in());
    }

    #[test]
    fn test_button_zoom_anchored_at_viewport_center() {
        let mut canvas = CanvasTransform::default();
        let center = canvas.viewport_center();
        let before = canvas.screen_to_world(center);
        assert!(canvas.zoom_in());
        assert!((canvas.scale() - 1.2).abs() < 1e-9);
        assert_close(canvas.screen_to_world(center), before);

        assert!(canvas.zoom_out());
        assert!(canvas.zoom_out());
        assert!((canvas.scale() - 0.8).abs() < 1e-9);
        assert_eq!(canvas.zoom_percent(), 80);

        assert!(canvas.reset_zoom());
        assert_eq!(canvas.scale(), 1.0);
    }

    #[test]
    fn test_center_view_and_move_to() {
        let mut canvas = CanvasTransform::default();
        canvas.zoom_in();
        canvas.move_to(Point::new(500.0, -200.0));
        assert_close(
            canvas.world_to_screen(Point::new(500.0, -200.0)),
            canvas.viewport_center(),
        );

        canvas.center_view();
        assert_eq!(canvas.translation(), Point::ORIGIN);
        assert_eq!(canvas.scale(), 1.0);
        assert_eq!(canvas.position_indicator(), (0, 0));
    }

    #[test]
    fn test_snap_to_grid_rounds_and_is_idempotent() {
        let canvas = CanvasTransform::default();
        assert_eq!(canvas.snap_to_grid(Point::new(74.0, 76.0)), Point::new(50.0, 100.0));
        assert_eq!(canvas.snap_to_grid(Point::new(-24.0, -26.0)), Point::new(-0.0, -50.0));

        for p in [Point::new(13.7, -88.2), Point::new(1234.5, 0.1), Point::new(-75.0, 25.0)] {
            let once = canvas.snap_to_grid(p);
            assert_eq!(canvas.snap_to_grid(once), once);
        }
    }

    #[test]
    fn test_random_placement_in_band() {
        let canvas = CanvasTransform::default();
        let mut rng = StdRng::seed_from_u64(7);
        let center = Point::new(0.0, 0.0);
        let grid_slack = canvas.config().grid_size;

        for _ in 0..200 {
            let p = canvas.random_placement(&mut rng, center);
            let r = p.distance_to(center);
            assert!(r >= canvas.config().placement_radius_min - grid_slack);
            assert!(r <= canvas.config().placement_radius_max + grid_slack);
            assert_eq!(canvas.snap_to_grid(p), p);
        }
    }

    #[test]
    fn test_position_on_circle() {
        let canvas = CanvasTransform::default();
        let mut rng = StdRng::seed_from_u64(1);
        let p = canvas.position_on_circle(&mut rng, 300.0, Some(0.0));
        assert_eq!(p, Point::new(300.0, 0.0));
    }

    #[test]
    fn test_grid_opacity() {
        let mut canvas = CanvasTransform::default();
        assert_eq!(canvas.grid_opacity(), 0.5);
        canvas.zoom_at(Point::ORIGIN, 0.7);
        assert_eq!(canvas.grid_opacity(), 0.3);
        canvas.zoom_at(Point::ORIGIN, 0.2);
        assert_eq!(canvas.grid_opacity(), 0.1);
    }
}
