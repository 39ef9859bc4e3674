use glam::Vec3;

/// Flat normal of a counter-clockwise triangle. Degenerate triangles get `Vec3::Y`.
pub fn face_normal(triangle: &[Vec3; 3]) -> Vec3 {
    (triangle[1] - triangle[0])
        .cross(triangle[2] - triangle[0])
        .try_normalize()
        .unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ccw_triangle_faces_positive_z() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!((face_normal(&tri) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn clockwise_triangle_flips() {
        let tri = [Vec3::ZERO, Vec3::Y, Vec3::X];
        assert!((face_normal(&tri) + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn degenerate_triangle_falls_back_to_up() {
        let tri = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert_eq!(face_normal(&tri), Vec3::Y);
    }
}
