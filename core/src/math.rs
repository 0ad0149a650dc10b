//! Math type aliases and helper functions.

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Build a [`Mat4`] from glTF-style column arrays (`m[column][row]`).
pub fn mat4_from_cols_array_2d(m: &[[f32; 4]; 4]) -> Mat4 {
    #[rustfmt::skip]
    let result = Mat4::new(
        m[0][0], m[1][0], m[2][0], m[3][0],
        m[0][1], m[1][1], m[2][1], m[3][1],
        m[0][2], m[1][2], m[2][2], m[3][2],
        m[0][3], m[1][3], m[2][3], m[3][3],
    );
    result
}

/// Normalize `v`, returning `None` for zero-length or non-finite input.
pub fn try_normalize(v: &Vec3) -> Option<Vec3> {
    let len = v.norm();
    if len > 0.0 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Any unit vector orthogonal to `n`.
///
/// Crosses `n` with the coordinate axis it is least aligned with. A zero or
/// non-finite `n` yields +X.
pub fn any_orthogonal(n: &Vec3) -> Vec3 {
    let Some(n) = try_normalize(n) else {
        return Vec3::x();
    };
    let a = n.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        Vec3::x()
    } else if a.y <= a.z {
        Vec3::y()
    } else {
        Vec3::z()
    };
    n.cross(&axis).normalize()
}
