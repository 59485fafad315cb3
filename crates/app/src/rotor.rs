//! Canvas geometry for the motor drawing
//!
//! Dimensions are those of a 120 px housing and scale with the space the
//! canvas is given. Angles are in degrees and grow clockwise on screen
//! (y points down).

use egui::{Pos2, Rect, Vec2};

/// Housing radius the reference dimensions are expressed against
const REFERENCE_RADIUS: f32 = 120.0;
/// Free space kept between the glow ring and the canvas edge
const CANVAS_MARGIN: f32 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnet {
    pub center: Pos2,
    pub radius: f32,
    pub pole: Pole,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coil {
    pub index: usize,
    pub center: Pos2,
    pub radius: f32,
    pub label_pos: Pos2,
    pub energized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorLayout {
    pub center: Pos2,
    /// Housing radius
    pub radius: f32,
}

impl RotorLayout {
    pub fn new(center: Pos2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Largest layout that fits `rect`, glow ring included
    pub fn fit(rect: Rect) -> Self {
        let radius = (rect.width().min(rect.height()) / 2.0 - CANVAS_MARGIN).max(20.0);
        Self::new(rect.center(), radius)
    }

    fn scale(&self) -> f32 {
        self.radius / REFERENCE_RADIUS
    }

    /// Point at `distance` from the center along `angle_deg`
    pub fn polar(&self, distance: f32, angle_deg: f64) -> Pos2 {
        let angle = angle_deg.to_radians() as f32;
        self.center + Vec2::angled(angle) * distance
    }

    pub fn glow_radius(&self) -> f32 {
        self.radius + 10.0 * self.scale()
    }

    pub fn inner_radius(&self) -> f32 {
        self.radius - 20.0 * self.scale()
    }

    pub fn rotor_radius(&self) -> f32 {
        70.0 * self.scale()
    }

    pub fn shaft_radius(&self) -> f32 {
        10.0 * self.scale()
    }

    /// Rotor magnets evenly spaced and turned by the rotor angle, poles alternating
    pub fn magnets(&self, count: usize, rotor_angle_deg: f64) -> Vec<Magnet> {
        let pitch = 360.0 / count.max(1) as f64;
        (0..count)
            .map(|i| Magnet {
                center: self.polar(50.0 * self.scale(), i as f64 * pitch + rotor_angle_deg),
                radius: 8.0 * self.scale(),
                pole: if i % 2 == 0 { Pole::North } else { Pole::South },
            })
            .collect()
    }

    /// Stationary stator coils, `active` energized
    pub fn coils(&self, count: usize, active: usize) -> Vec<Coil> {
        let pitch = 360.0 / count.max(1) as f64;
        (0..count)
            .map(|i| {
                let angle = i as f64 * pitch;
                Coil {
                    index: i,
                    center: self.polar(0.6 * self.radius, angle),
                    radius: 15.0 * self.scale(),
                    label_pos: self.polar(0.8 * self.radius, angle),
                    energized: i == active,
                }
            })
            .collect()
    }

    /// Step indicator dot riding just inside the housing
    pub fn indicator(&self, rotor_angle_deg: f64) -> (Pos2, f32) {
        let scale = self.scale();
        (self.polar(self.radius - 10.0 * scale, rotor_angle_deg), 5.0 * scale)
    }
}

/// Progress bar fill for a 0..=100 readout
pub fn progress_fraction(value: u32) -> f32 {
    (value as f32 / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layout() -> RotorLayout {
        RotorLayout::new(Pos2::new(250.0, 175.0), 120.0)
    }

    #[test]
    fn test_first_magnet_follows_rotor_angle() {
        let layout = layout();
        let magnets = layout.magnets(8, 0.0);
        assert_eq!(magnets.len(), 8);
        assert_relative_eq!(magnets[0].center.x, 300.0, epsilon = 1e-3);
        assert_relative_eq!(magnets[0].center.y, 175.0, epsilon = 1e-3);

        // 50 steps of 1.8° is a quarter turn: clockwise on screen, so y grows
        let turned = layout.magnets(8, 90.0);
        assert_relative_eq!(turned[0].center.x, 250.0, epsilon = 1e-3);
        assert_relative_eq!(turned[0].center.y, 225.0, epsilon = 1e-3);
    }

    #[test]
    fn test_magnet_poles_alternate() {
        let poles: Vec<Pole> = layout().magnets(4, 0.0).iter().map(|m| m.pole).collect();
        assert_eq!(poles, vec![Pole::North, Pole::South, Pole::North, Pole::South]);
    }

    #[test]
    fn test_full_revolution_returns_magnets() {
        let layout = layout();
        let start = layout.magnets(8, 0.0);
        let end = layout.magnets(8, 200.0 * 1.8);
        for (a, b) in start.iter().zip(&end) {
            assert_relative_eq!(a.center.x, b.center.x, epsilon = 1e-3);
            assert_relative_eq!(a.center.y, b.center.y, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_single_coil_energized() {
        let coils = layout().coils(4, 2);
        assert_eq!(coils.iter().filter(|c| c.energized).count(), 1);
        assert!(coils[2].energized);
        // coil 2 sits at 180°
        assert_relative_eq!(coils[2].center.x, 250.0 - 72.0, epsilon = 1e-3);
        assert_relative_eq!(coils[2].label_pos.x, 250.0 - 96.0, epsilon = 1e-3);
    }

    #[test]
    fn test_indicator_inside_housing() {
        let layout = layout();
        let (pos, radius) = layout.indicator(270.0);
        assert_relative_eq!(pos.x, 250.0, epsilon = 1e-3);
        assert_relative_eq!(pos.y, 175.0 - 110.0, epsilon = 1e-3);
        assert_relative_eq!(radius, 5.0);
    }

    #[test]
    fn test_fit_scales_dimensions() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(500.0, 290.0));
        let layout = RotorLayout::fit(rect);
        assert_relative_eq!(layout.radius, 120.0);
        assert_eq!(layout.center, Pos2::new(250.0, 145.0));

        let half = RotorLayout::new(Pos2::ZERO, 60.0);
        assert_relative_eq!(half.rotor_radius(), 35.0);
        assert_relative_eq!(half.glow_radius(), 65.0);
    }

    #[test]
    fn test_progress_fraction_clamped() {
        assert_relative_eq!(progress_fraction(0), 0.0);
        assert_relative_eq!(progress_fraction(47), 0.47);
        assert_relative_eq!(progress_fraction(100), 1.0);
        assert_relative_eq!(progress_fraction(250), 1.0);
    }
}
