//! `PointField`: the point set, its connections, and the update/draw loop.
//!
//! A field is built for a surface size from a [`FieldConfig`] and a seed.
//! [`PointField::update`] advances every point by one tick (orbit velocity,
//! activation ramp, Euler step) and [`PointField::draw`] repaints the whole
//! surface. Both are infallible; only construction and resizing validate.

use glam::DVec2;
use serde_json::Value;
use std::f64::consts::TAU;
use tracing::debug;

use crate::activation::ActivationSettings;
use crate::color::Srgb;
use crate::config::{FieldConfig, ResizePolicy};
use crate::engine::Engine;
use crate::error::EngineError;
use crate::generate::{generate, Generated};
use crate::graph::Connections;
use crate::orbit::orbit_velocity;
use crate::point::Point;
use crate::preset::Preset;
use crate::prng::Xorshift64;
use crate::surface::Surface;

/// Points, connections and the surface geometry they live on.
#[derive(Debug, Clone)]
pub struct PointField {
    points: Vec<Point>,
    connections: Connections,
    width: f64,
    height: f64,
    center: DVec2,
    config: FieldConfig,
    activation: ActivationSettings,
    rng: Xorshift64,
}

fn check_dimensions(width: f64, height: f64) -> Result<(), EngineError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidDimensions)
    }
}

impl PointField {
    /// Generates a field for a `width x height` surface.
    ///
    /// Returns `EngineError::InvalidDimensions` for empty or non-finite
    /// sizes and `EngineError::InvalidParam` if `config` does not validate.
    pub fn new(
        width: f64,
        height: f64,
        seed: u64,
        config: FieldConfig,
    ) -> Result<Self, EngineError> {
        check_dimensions(width, height)?;
        config.validate()?;
        let mut rng = Xorshift64::new(seed);
        let Generated {
            points,
            connections,
        } = generate(width, height, &config, &mut rng);
        Ok(Self {
            points,
            connections,
            width,
            height,
            center: DVec2::new(width / 2.0, height / 2.0),
            activation: config.activation_settings(),
            config,
            rng,
        })
    }

    /// Builds from `base` with JSON overrides applied.
    pub fn from_json(
        width: f64,
        height: f64,
        seed: u64,
        base: &FieldConfig,
        params: &Value,
    ) -> Result<Self, EngineError> {
        Self::new(width, height, seed, FieldConfig::from_json(base, params)?)
    }

    /// Builds from a named preset with JSON overrides applied.
    pub fn from_preset(
        name: &str,
        width: f64,
        height: f64,
        seed: u64,
        params: &Value,
    ) -> Result<Self, EngineError> {
        let preset = Preset::from_name(name)?;
        Self::from_json(width, height, seed, &preset.config(), params)
    }

    /// Replaces the generated points with `points`, dropping connections.
    ///
    /// Lets hosts and tests place points by hand.
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.connections = Connections::new(points.len());
        self.points = points;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The orbit attractor: the middle of the surface.
    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Advances every point by one tick.
    pub fn update(&mut self) {
        let center = self.center;
        for point in &mut self.points {
            if self.config.orbit {
                point.velocity = orbit_velocity(point.position, center, point.mass());
            }
            if self.config.activation {
                point.activation.maybe_trigger(&self.activation, &mut self.rng);
                point.activation.step(&self.activation);
            }
            point.integrate();
        }
    }

    fn point_color(&self, point: &Point) -> Srgb {
        if self.config.activation {
            point.activation.color()
        } else {
            self.config.fill_color
        }
    }

    fn is_visible(&self, point: &Point) -> bool {
        !self.config.activation || point.activation.is_active()
    }

    /// Clears `surface` and draws connections, then points.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear_rect(0.0, 0.0, surface.width(), surface.height());

        if self.connections.has_edges() {
            surface.set_stroke_style(self.config.stroke_color);
            surface.begin_path();
            for (a, b) in self.connections.edges() {
                let (pa, pb) = (self.points[a].position, self.points[b].position);
                surface.move_to(pa.x, pa.y);
                surface.line_to(pb.x, pb.y);
            }
            surface.stroke();
        }

        for point in self.points.iter().filter(|p| self.is_visible(p)) {
            let color = self.point_color(point);
            let prior = surface.fill_style();
            if color != prior {
                surface.set_fill_style(color);
            }
            surface.begin_path();
            surface.arc(point.position.x, point.position.y, point.mass(), 0.0, TAU);
            surface.close_path();
            surface.fill();
            if color != prior {
                surface.set_fill_style(prior);
            }
        }
    }

    /// Applies a new surface size according to the resize policy.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.center = DVec2::new(width / 2.0, height / 2.0);
        if self.config.resize == ResizePolicy::Regenerate {
            let Generated {
                points,
                connections,
            } = generate(width, height, &self.config, &mut self.rng);
            self.points = points;
            self.connections = connections;
        }
        debug!(
            width,
            height,
            policy = self.config.resize.as_str(),
            points = self.points.len(),
            "resized point field"
        );
        Ok(())
    }
}

impl Engine for PointField {
    fn step(&mut self) {
        self.update();
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.draw(surface);
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        PointField::resize(self, width, height)
    }

    fn params(&self) -> Value {
        self.config.to_json()
    }

    fn param_schema(&self) -> Value {
        self.config.schema()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridExtent, Layout};
    use crate::surface::{DrawCommand, Recorder};
    use serde_json::json;

    fn plain_grid() -> FieldConfig {
        FieldConfig {
            layout: Layout::Grid,
            grid_extent: GridExtent::Surface,
            orbit: false,
            activation: false,
            ..FieldConfig::default()
        }
    }

    fn single_point(config: FieldConfig, position: DVec2, mass: f64) -> PointField {
        PointField::new(200.0, 200.0, 1, config)
            .unwrap()
            .with_points(vec![Point::new(position, mass)])
    }

    // ---- Construction ----

    #[test]
    fn new_rejects_bad_dimensions() {
        for (w, h) in [(0.0, 10.0), (10.0, 0.0), (-5.0, 10.0), (f64::NAN, 10.0)] {
            assert!(matches!(
                PointField::new(w, h, 1, plain_grid()),
                Err(EngineError::InvalidDimensions)
            ));
        }
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = FieldConfig {
            spacing: 0.0,
            ..plain_grid()
        };
        assert!(PointField::new(100.0, 100.0, 1, config).is_err());
    }

    #[test]
    fn center_is_middle_of_surface() {
        let field = PointField::new(640.0, 480.0, 1, plain_grid()).unwrap();
        assert_eq!(field.center(), DVec2::new(320.0, 240.0));
    }

    #[test]
    fn from_preset_applies_overrides() {
        let field =
            PointField::from_preset("drift", 300.0, 300.0, 5, &json!({"scatter_count": 12}))
                .unwrap();
        assert_eq!(field.points().len(), 12);
        assert!(matches!(
            PointField::from_preset("nope", 300.0, 300.0, 5, &json!({})),
            Err(EngineError::UnknownPreset(_))
        ));
    }

    // ---- Update ----

    #[test]
    fn orbit_example_moves_point_down_by_one() {
        let config = FieldConfig {
            orbit: true,
            ..plain_grid()
        };
        // 10px right of the center (100, 100), mass 1.
        let mut field = single_point(config, DVec2::new(110.0, 100.0), 1.0);
        field.update();
        let p = field.points()[0];
        assert!((p.velocity - DVec2::new(0.0, 1.0)).length() < 1e-12);
        assert!((p.position - DVec2::new(110.0, 101.0)).length() < 1e-12);
    }

    #[test]
    fn heavier_points_drift_slower() {
        let config = FieldConfig {
            orbit: true,
            ..plain_grid()
        };
        let mut light = single_point(config.clone(), DVec2::new(150.0, 60.0), 1.0);
        let mut heavy = single_point(config, DVec2::new(150.0, 60.0), 2.0);
        light.update();
        heavy.update();
        let vl = light.points()[0].velocity.length();
        let vh = heavy.points()[0].velocity.length();
        assert!((vl - 2.0 * vh).abs() < 1e-12);
    }

    #[test]
    fn without_orbit_points_stay_put() {
        let mut field = PointField::new(300.0, 300.0, 3, plain_grid()).unwrap();
        let before: Vec<DVec2> = field.points().iter().map(|p| p.position).collect();
        for _ in 0..10 {
            field.update();
        }
        let after: Vec<DVec2> = field.points().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn activation_levels_stay_clamped_over_many_ticks() {
        let config = FieldConfig {
            activation: true,
            activation_per_second: 1.0,
            fps: 5.0,
            ..plain_grid()
        };
        let mut field = PointField::new(300.0, 300.0, 8, config).unwrap();
        let max = field.config().activation_max;
        let mut seen_active = false;
        for _ in 0..500 {
            field.update();
            for p in field.points() {
                assert!((0.0..=max).contains(&p.activation.level));
                seen_active |= p.activation.is_active();
            }
        }
        assert!(seen_active, "some point should have pulsed");
    }

    #[test]
    fn same_seed_same_evolution() {
        let preset = Preset::Orbital.config();
        let mut a = PointField::new(400.0, 300.0, 42, preset.clone()).unwrap();
        let mut b = PointField::new(400.0, 300.0, 42, preset).unwrap();
        for _ in 0..50 {
            a.update();
            b.update();
        }
        assert_eq!(a.points(), b.points());
    }

    // ---- Draw ----

    #[test]
    fn draw_clears_full_surface_first() {
        let field = PointField::new(300.0, 300.0, 1, plain_grid()).unwrap();
        let mut rec = Recorder::new(320.0, 240.0);
        field.draw(&mut rec);
        assert_eq!(
            rec.commands()[0],
            DrawCommand::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 240.0
            }
        );
    }

    #[test]
    fn draw_fills_one_circle_per_point_with_mass_radius() {
        let field = PointField::new(300.0, 300.0, 1, plain_grid()).unwrap();
        let mut rec = Recorder::new(300.0, 300.0);
        field.draw(&mut rec);
        assert_eq!(rec.fill_count(), field.points().len());
        let radii: Vec<f64> = rec
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arc { radius, end_angle, .. } => {
                    assert_eq!(*end_angle, TAU);
                    Some(*radius)
                }
                _ => None,
            })
            .collect();
        let masses: Vec<f64> = field.points().iter().map(Point::mass).collect();
        assert_eq!(radii, masses);
    }

    #[test]
    fn dark_points_are_not_drawn_when_activation_is_on() {
        let config = FieldConfig {
            activation: true,
            ..plain_grid()
        };
        let field = PointField::new(300.0, 300.0, 1, config).unwrap();
        let mut rec = Recorder::new(300.0, 300.0);
        field.draw(&mut rec);
        assert_eq!(rec.fill_count(), 0);
    }

    #[test]
    fn fill_style_is_restored_after_each_point() {
        let config = FieldConfig {
            activation: true,
            ..plain_grid()
        };
        let mut point = Point::new(DVec2::new(50.0, 50.0), 2.0);
        point.activation.level = 42.0;
        let field = PointField::new(200.0, 200.0, 1, config)
            .unwrap()
            .with_points(vec![point]);
        let mut rec = Recorder::new(200.0, 200.0);
        field.draw(&mut rec);
        let styles: Vec<Srgb> = rec
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::SetFillStyle { color } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(styles, vec![Srgb::grey(42.0), Srgb::BLACK]);
        assert_eq!(rec.fill_style(), Srgb::BLACK);
    }

    #[test]
    fn matching_fill_style_is_not_touched() {
        let mut rec = Recorder::new(200.0, 200.0);
        rec.set_fill_style(Srgb::WHITE);
        rec.take_commands();
        let config = FieldConfig {
            fill_color: Srgb::WHITE,
            ..plain_grid()
        };
        let field = single_point(config, DVec2::new(10.0, 10.0), 1.0);
        field.draw(&mut rec);
        assert!(!rec
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::SetFillStyle { .. })));
    }

    #[test]
    fn each_edge_is_stroked_once() {
        let config = FieldConfig {
            spacing: 100.0,
            connection_probability: 1.0,
            ..plain_grid()
        };
        let field = PointField::new(300.0, 300.0, 1, config).unwrap();
        let mut rec = Recorder::new(300.0, 300.0);
        field.draw(&mut rec);
        let moves = rec
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::MoveTo { .. }))
            .count();
        let strokes = rec
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke))
            .count();
        assert_eq!(moves, field.connections().edge_count());
        assert_eq!(strokes, 1);
        assert!(rec.commands().contains(&DrawCommand::SetStrokeStyle {
            color: field.config().stroke_color
        }));
    }

    #[test]
    fn no_connections_means_no_stroke() {
        let field = PointField::new(300.0, 300.0, 1, plain_grid()).unwrap();
        let mut rec = Recorder::new(300.0, 300.0);
        field.draw(&mut rec);
        assert!(!rec.commands().contains(&DrawCommand::Stroke));
    }

    // ---- Resize ----

    #[test]
    fn regenerate_resize_follows_new_dimensions() {
        let config = FieldConfig {
            resize: ResizePolicy::Regenerate,
            connection_probability: 0.5,
            ..plain_grid()
        };
        let mut field = PointField::new(300.0, 300.0, 1, config).unwrap();
        assert_eq!(field.points().len(), 100);
        field.resize(600.0, 90.0).unwrap();
        assert_eq!(field.points().len(), 20 * 3);
        assert_eq!(field.connections().len(), field.points().len());
        assert_eq!(field.center(), DVec2::new(300.0, 45.0));
    }

    #[test]
    fn recenter_resize_keeps_points() {
        let config = FieldConfig {
            resize: ResizePolicy::Recenter,
            ..plain_grid()
        };
        let mut field = PointField::new(300.0, 300.0, 1, config).unwrap();
        let before = field.points().to_vec();
        field.resize(900.0, 500.0).unwrap();
        assert_eq!(field.points(), before.as_slice());
        assert_eq!(field.center(), DVec2::new(450.0, 250.0));
        assert_eq!((field.width(), field.height()), (900.0, 500.0));
    }

    #[test]
    fn failed_resize_changes_nothing() {
        let mut field = PointField::new(300.0, 200.0, 1, plain_grid()).unwrap();
        assert!(field.resize(0.0, 100.0).is_err());
        assert_eq!(field.center(), DVec2::new(150.0, 100.0));
    }

    // ---- Engine trait ----

    #[test]
    fn engine_params_and_schema_share_keys() {
        let field = PointField::new(300.0, 300.0, 1, plain_grid()).unwrap();
        let params = field.params();
        let schema = field.param_schema();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing {key}");
        }
    }

    #[test]
    fn field_is_usable_as_dyn_engine() {
        let mut field: Box<dyn Engine> =
            Box::new(PointField::new(300.0, 300.0, 1, Preset::Orbital.config()).unwrap());
        field.step();
        let mut rec = Recorder::new(300.0, 300.0);
        field.render(&mut rec);
        assert!(!rec.commands().is_empty());
        assert!(field.resize(100.0, 100.0).is_ok());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn orbit_speed_is_inverse_mass_everywhere(
                x in 0.0_f64..500.0,
                y in 0.0_f64..500.0,
                mass in 0.5_f64..5.0,
            ) {
                let config = FieldConfig { orbit: true, ..plain_grid() };
                let mut field = PointField::new(500.0, 500.0, 1, config)
                    .unwrap()
                    .with_points(vec![Point::new(DVec2::new(x, y), mass)]);
                field.update();
                let v = field.points()[0].velocity.length();
                prop_assert!((v - 1.0 / mass).abs() < 1e-9);
            }

            #[test]
            fn regenerated_count_matches_formula(
                w in 40.0_f64..900.0,
                h in 40.0_f64..900.0,
                seed: u64,
            ) {
                let config = FieldConfig { resize: ResizePolicy::Regenerate, ..plain_grid() };
                let mut field = PointField::new(300.0, 300.0, seed, config).unwrap();
                field.resize(w, h).unwrap();
                let s = field.config().spacing;
                let expected = (w / s).floor() as usize * (h / s).floor() as usize;
                prop_assert_eq!(field.points().len(), expected);
            }
        }
    }
}
