use glam::Vec3;

/// Piecewise cubic Bézier curve. Control points `[0..4]`, `[3..7]`, `[6..10]`, ...
/// each make one segment, so consecutive segments share an end point.
#[derive(Clone, Debug, Default)]
pub struct Bezier {
    control_points: Vec<Vec3>,
    curve_points: Vec<Vec3>,
}

impl Bezier {
    pub fn new(control_points: Vec<Vec3>) -> Self {
        Self {
            control_points,
            curve_points: Vec::new(),
        }
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    /// Samples every segment at `t = k / points_per_segment`. Shared segment ends are
    /// only emitted once. Trailing control points that cannot form a full segment are
    /// ignored.
    pub fn generate_curve(&mut self, points_per_segment: usize) {
        let steps = points_per_segment.max(1);
        self.curve_points.clear();
        for (segment, p) in self.control_points.windows(4).step_by(3).enumerate() {
            let first = usize::from(segment > 0);
            self.curve_points.extend(
                (first..=steps).map(|k| cubic([p[0], p[1], p[2], p[3]], k as f32 / steps as f32)),
            );
        }
    }

    pub fn curve_points(&self) -> &[Vec3] {
        &self.curve_points
    }

    pub fn curve_point_count(&self) -> usize {
        self.curve_points.len()
    }

    pub fn point_on_curve(&self, index: usize) -> Option<Vec3> {
        self.curve_points.get(index).copied()
    }
}

/// Cubic Bernstein blend of four control points.
fn cubic(p: [Vec3; 4], t: f32) -> Vec3 {
    let u = 1.0 - t;
    p[0] * (u * u * u) + p[1] * (3.0 * u * u * t) + p[2] * (3.0 * u * t * t) + p[3] * (t * t * t)
}

/// Control points tracing a figure eight through the origin, listed twice so the
/// curve closes on itself.
pub fn infinity_control_points() -> Vec<Vec3> {
    let loop_ = [
        (-0.5, 0.0),
        (-0.375, 0.25),
        (-0.25, 0.5),
        (-0.125, 0.25),
        (0.0, 0.0),
        (0.125, -0.25),
        (0.25, -0.5),
        (0.375, -0.25),
        (0.5, 0.0),
        (0.375, 0.25),
        (0.25, 0.5),
        (0.125, 0.25),
        (0.0, 0.0),
        (-0.125, -0.25),
        (-0.25, -0.5),
        (-0.375, -0.25),
        (-0.5, 0.0),
    ];
    loop_
        .iter()
        .chain(loop_.iter())
        .map(|&(x, y)| Vec3::new(x, y, 0.0))
        .collect()
}

/// Two triangles covering the square of half side `half` centred on `point`.
pub fn square_around(point: Vec3, half: f32) -> [Vec3; 6] {
    let Vec3 { x, y, z } = point;
    [
        Vec3::new(x - half, y + half, z),
        Vec3::new(x - half, y - half, z),
        Vec3::new(x + half, y - half, z),
        Vec3::new(x - half, y + half, z),
        Vec3::new(x + half, y + half, z),
        Vec3::new(x + half, y - half, z),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_passes_through_its_ends() {
        let mut curve = Bezier::new(vec![
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::X,
        ]);
        curve.generate_curve(4);
        assert_eq!(curve.curve_point_count(), 5);
        assert_eq!(curve.point_on_curve(0), Some(Vec3::ZERO));
        assert_eq!(curve.point_on_curve(4), Some(Vec3::X));
        // symmetric control polygon peaks halfway at 3/4 of its height
        let mid = curve.point_on_curve(2).unwrap();
        assert!((mid - Vec3::new(0.5, 0.75, 0.0)).length() < 1e-6);
        assert_eq!(curve.point_on_curve(5), None);
    }

    #[test]
    fn segments_share_end_points() {
        let mut curve = Bezier::new(infinity_control_points());
        assert_eq!(curve.control_points().len(), 34);
        curve.generate_curve(15);
        // eleven segments, the first keeps its start point
        assert_eq!(curve.curve_point_count(), 1 + 11 * 15);
        assert_eq!(curve.point_on_curve(0), Some(Vec3::new(-0.5, 0.0, 0.0)));
        assert_eq!(curve.point_on_curve(15), Some(Vec3::new(-0.125, 0.25, 0.0)));
    }

    #[test]
    fn regenerating_replaces_points() {
        let mut curve = Bezier::new(infinity_control_points());
        curve.generate_curve(15);
        curve.generate_curve(3);
        assert_eq!(curve.curve_point_count(), 1 + 11 * 3);
    }

    #[test]
    fn too_few_control_points_make_no_curve() {
        let mut curve = Bezier::new(vec![Vec3::ZERO, Vec3::X]);
        curve.generate_curve(10);
        assert_eq!(curve.curve_point_count(), 0);
    }

    #[test]
    fn square_is_centred() {
        let square = square_around(Vec3::new(1.0, 1.0, 0.0), 0.1);
        let centre = square.iter().copied().sum::<Vec3>() / 6.0;
        assert!((centre - Vec3::new(1.0, 1.0, 0.0)).length() < 0.05);
        assert!((square[0] - Vec3::new(0.9, 1.1, 0.0)).length() < 1e-6);
        assert!((square[5] - Vec3::new(1.1, 0.9, 0.0)).length() < 1e-6);
    }
}
