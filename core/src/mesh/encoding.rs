//! Octahedral and unsigned-normalized vertex encodings.
//!
//! Directions (normals, tangents) are projected onto an octahedron, unfolded
//! into the `[-1, 1]²` square, remapped to `[0, 1]²` and stored as two 12-bit
//! values in three bytes ([`Unorm12x2`]). Positions are stored as unorm16
//! relative to the primitive [`Bounds`]. Texture coordinates are split into a
//! 4-bit integer offset per axis and a 12-bit fractional part.
//!
//! All encoders truncate; decoding returns the quantized value, so
//! encode → decode → encode reproduces the first encoding exactly.

use crate::math::{Vec3, try_normalize};

use super::bounds::Bounds;
use super::vertex::{PackedVertex, Vertex};

/// Largest 12-bit value.
pub const UNORM12_MAX: u16 = 0xfff;
/// Largest 16-bit value as a float scale.
pub const UNORM16_SCALE: f32 = u16::MAX as f32;
/// Largest integer texture offset per axis.
pub const TEX_OFFSET_MAX: i32 = 0xf;

/// +1 for `v >= 0` (including both zeros), -1 otherwise.
#[inline]
pub fn sign_not_zero(v: f32) -> f32 {
    if v >= 0.0 { 1.0 } else { -1.0 }
}

/// Project a direction onto the octahedral square `[-1, 1]²`.
///
/// The input does not need to be normalized: the projection divides by the
/// L1 norm. A zero or non-finite vector encodes as `[0, 0]` (+Z).
pub fn encode_octahedral(v: [f32; 3]) -> [f32; 2] {
    let [x, y, z] = v;
    let denom = x.abs() + y.abs() + z.abs();
    if !(denom > 0.0 && denom.is_finite()) {
        return [0.0, 0.0];
    }
    let inv = 1.0 / denom;
    let px = x * inv;
    let py = y * inv;

    if z <= 0.0 {
        [
            (1.0 - py.abs()) * sign_not_zero(px),
            (1.0 - px.abs()) * sign_not_zero(py),
        ]
    } else {
        [px, py]
    }
}

/// Inverse of [`encode_octahedral`], returning a unit vector.
pub fn decode_octahedral(e: [f32; 2]) -> [f32; 3] {
    let [x, y] = e;
    let z = 1.0 - x.abs() - y.abs();
    let (x, y) = if z < 0.0 {
        (
            (1.0 - y.abs()) * sign_not_zero(x),
            (1.0 - x.abs()) * sign_not_zero(y),
        )
    } else {
        (x, y)
    };
    let v = try_normalize(&Vec3::new(x, y, z)).unwrap_or_else(Vec3::z);
    [v.x, v.y, v.z]
}

/// Remap `[-1, 1]²` to `[0, 1]²`.
#[inline]
pub fn to_unit_range(v: [f32; 2]) -> [f32; 2] {
    [v[0] * 0.5 + 0.5, v[1] * 0.5 + 0.5]
}

/// Remap `[0, 1]²` to `[-1, 1]²`.
#[inline]
pub fn from_unit_range(v: [f32; 2]) -> [f32; 2] {
    [v[0] * 2.0 - 1.0, v[1] * 2.0 - 1.0]
}

/// Two 12-bit unsigned normalized values packed into three bytes.
///
/// Reading the bytes as a big-endian 24-bit field, the first component
/// occupies bits 12..24 and the second bits 0..12:
///
/// ```text
/// byte 0: x[11..4]
/// byte 1: x[3..0] y[11..8]
/// byte 2: y[7..0]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unorm12x2(pub [u8; 3]);

impl Unorm12x2 {
    /// Pack two raw 12-bit values. Bits above 12 are discarded.
    pub fn from_bits(x: u16, y: u16) -> Self {
        let x = x & UNORM12_MAX;
        let y = y & UNORM12_MAX;
        Self([
            (x >> 4) as u8,
            (((x & 0xf) << 4) | (y >> 8)) as u8,
            (y & 0xff) as u8,
        ])
    }

    /// Quantize a pair in `[0, 1]`. Values outside are clamped, NaN maps to 0.
    pub fn encode(v: [f32; 2]) -> Self {
        Self::from_bits(quantize_unorm12(v[0]), quantize_unorm12(v[1]))
    }

    /// The two raw 12-bit values.
    pub fn bits(&self) -> (u16, u16) {
        let [b0, b1, b2] = self.0;
        let field = ((b0 as u32) << 16) | ((b1 as u32) << 8) | b2 as u32;
        (
            ((field >> 12) as u16) & UNORM12_MAX,
            (field as u16) & UNORM12_MAX,
        )
    }

    /// Dequantize to `[0, 1]²`.
    pub fn decode(&self) -> [f32; 2] {
        let (x, y) = self.bits();
        [x as f32 / UNORM12_MAX as f32, y as f32 / UNORM12_MAX as f32]
    }

    pub fn bytes(&self) -> [u8; 3] {
        self.0
    }
}

#[inline]
fn quantize_unorm12(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * UNORM12_MAX as f32) as u16
}

/// Octahedral-encode a direction into three bytes.
pub fn pack_direction(v: [f32; 3]) -> Unorm12x2 {
    let n = try_normalize(&Vec3::from(v)).map_or(v, |n| [n.x, n.y, n.z]);
    Unorm12x2::encode(to_unit_range(encode_octahedral(n)))
}

/// Decode a direction written by [`pack_direction`].
pub fn unpack_direction(packed: Unorm12x2) -> [f32; 3] {
    decode_octahedral(from_unit_range(packed.decode()))
}

/// Whether an extent cannot be used as a quantization divisor.
#[inline]
pub fn is_degenerate_extent(size: f32) -> bool {
    !(size > 0.0 && size.is_finite())
}

/// Axes of `bounds` that are skipped by position quantization.
pub fn degenerate_axes(bounds: &Bounds) -> [bool; 3] {
    bounds.size.map(is_degenerate_extent)
}

/// Quantize a position to unorm16 relative to `bounds`.
///
/// Degenerate axes (zero or invalid extent) are stored as 0.
pub fn quantize_position(p: [f32; 3], bounds: &Bounds) -> [u16; 3] {
    std::array::from_fn(|axis| {
        let size = bounds.size[axis];
        if is_degenerate_extent(size) {
            return 0;
        }
        let t = (p[axis] - bounds.offset[axis]) / size;
        (t.clamp(0.0, 1.0) * UNORM16_SCALE) as u16
    })
}

/// Inverse of [`quantize_position`]. Degenerate axes decode to the offset.
pub fn dequantize_position(q: [u16; 3], bounds: &Bounds) -> [f32; 3] {
    std::array::from_fn(|axis| {
        let size = bounds.size[axis];
        if is_degenerate_extent(size) {
            bounds.offset[axis]
        } else {
            bounds.offset[axis] + (q[axis] as f32 / UNORM16_SCALE) * size
        }
    })
}

/// Conditions met while packing a texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TexCoordFlags {
    /// A component was negative; offset and fraction clamped to 0.
    pub negative: bool,
    /// A component's integer part exceeded 15.
    pub clamped: bool,
}

/// Split a texture coordinate into its fractional part and integer offset.
///
/// The integer part truncates toward zero and is clamped to `[0, 15]`; the
/// two offsets share one byte as `(y << 4) | x`.
pub fn quantize_tex_coord(t: [f32; 2]) -> (Unorm12x2, u8, TexCoordFlags) {
    let mut flags = TexCoordFlags::default();
    let mut frac = [0.0f32; 2];
    let mut offset = [0u8; 2];

    for axis in 0..2 {
        let whole = t[axis].trunc();
        frac[axis] = t[axis] - whole;
        if t[axis] < 0.0 {
            flags.negative = true;
        }
        let whole = whole as i32;
        if whole > TEX_OFFSET_MAX {
            flags.clamped = true;
        }
        offset[axis] = whole.clamp(0, TEX_OFFSET_MAX) as u8;
    }

    (Unorm12x2::encode(frac), (offset[1] << 4) | offset[0], flags)
}

/// Inverse of [`quantize_tex_coord`] for non-negative coordinates.
pub fn dequantize_tex_coord(frac: Unorm12x2, offset: u8) -> [f32; 2] {
    let [fx, fy] = frac.decode();
    [(offset & 0xf) as f32 + fx, (offset >> 4) as f32 + fy]
}

/// Pack one vertex against its primitive bounds.
pub fn pack_vertex(v: &Vertex, bounds: &Bounds) -> (PackedVertex, TexCoordFlags) {
    let (tex_coord, tex_offset, flags) = quantize_tex_coord(v.tex_coord);
    let packed = PackedVertex {
        position: quantize_position(v.position, bounds),
        tangent: pack_direction(v.tangent).bytes(),
        normal: pack_direction(v.normal).bytes(),
        tex_coord: tex_coord.bytes(),
        tex_offset,
    };
    (packed, flags)
}
