//! Unpacked and packed vertex types.
//!
//! [`Vertex`] is the working representation while a primitive is processed.
//! [`PackedVertex`] is the 16-byte output consumed by the vertex shader:
//!
//! ```text
//! offset 0:  u16 position.x
//! offset 2:  u16 position.y
//! offset 4:  u16 position.z
//! offset 6:  u8  tangent[3]    (unorm 12x2, octahedral)
//! offset 9:  u8  normal[3]     (unorm 12x2, octahedral)
//! offset 12: u8  tex_coord[3]  (unorm 12x2, fractional part)
//! offset 15: u8  tex_offset    (low nibble x, high nibble y)
//! ```

use static_assertions::const_assert_eq;

/// Full-precision vertex used during preprocessing.
///
/// Plain `#[repr(C)]` floats with no padding, so two vertices compare
/// bit-identical exactly when their bytes match.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Bit pattern of every field, for exact comparisons and hashing.
    pub fn bits(&self) -> [u32; 11] {
        bytemuck::cast(*self)
    }
}

/// Quantized vertex, see the module docs for the byte layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex {
    /// Position relative to the primitive bounds, unorm16 per axis.
    pub position: [u16; 3],
    /// Octahedral tangent, unorm 12x2.
    pub tangent: [u8; 3],
    /// Octahedral normal, unorm 12x2.
    pub normal: [u8; 3],
    /// Fractional texture coordinate, unorm 12x2.
    pub tex_coord: [u8; 3],
    /// Integer texture coordinate offset, two 4-bit values.
    pub tex_offset: u8,
}

const_assert_eq!(std::mem::size_of::<Vertex>(), 44);
const_assert_eq!(std::mem::size_of::<PackedVertex>(), PackedVertex::SIZE);

impl PackedVertex {
    /// Size in bytes of one packed vertex.
    pub const SIZE: usize = 16;

    /// Serialize with little-endian scalar fields.
    pub fn to_le_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        for (axis, value) in self.position.iter().enumerate() {
            out[axis * 2..axis * 2 + 2].copy_from_slice(&value.to_le_bytes());
        }
        out[6..9].copy_from_slice(&self.tangent);
        out[9..12].copy_from_slice(&self.normal);
        out[12..15].copy_from_slice(&self.tex_coord);
        out[15] = self.tex_offset;
        out
    }

    /// Parse the layout written by [`Self::to_le_bytes`].
    pub fn from_le_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let position =
            std::array::from_fn(|axis| u16::from_le_bytes([bytes[axis * 2], bytes[axis * 2 + 1]]));
        Self {
            position,
            tangent: [bytes[6], bytes[7], bytes[8]],
            normal: [bytes[9], bytes[10], bytes[11]],
            tex_coord: [bytes[12], bytes[13], bytes[14]],
            tex_offset: bytes[15],
        }
    }
}

/// Semantic of a packed vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackedAttributeSemantic {
    Position,
    Tangent,
    Normal,
    TexCoord,
    TexCoordOffset,
}

/// Storage format of a packed vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackedAttributeFormat {
    /// Three unsigned normalized 16-bit values.
    Unorm16x3,
    /// Two 12-bit unsigned normalized values in three bytes.
    Unorm12x2,
    /// Two 4-bit unsigned integers in one byte.
    Uint4x2,
}

impl PackedAttributeFormat {
    /// Size of the attribute in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Unorm16x3 => 6,
            Self::Unorm12x2 => 3,
            Self::Uint4x2 => 1,
        }
    }
}

/// One attribute of the packed vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedAttribute {
    pub semantic: PackedAttributeSemantic,
    pub format: PackedAttributeFormat,
    /// Byte offset within [`PackedVertex`].
    pub offset: u32,
}

/// Layout of [`PackedVertex`] for building a vertex input description.
pub const PACKED_VERTEX_ATTRIBUTES: [PackedAttribute; 5] = [
    PackedAttribute {
        semantic: PackedAttributeSemantic::Position,
        format: PackedAttributeFormat::Unorm16x3,
        offset: 0,
    },
    PackedAttribute {
        semantic: PackedAttributeSemantic::Tangent,
        format: PackedAttributeFormat::Unorm12x2,
        offset: 6,
    },
    PackedAttribute {
        semantic: PackedAttributeSemantic::Normal,
        format: PackedAttributeFormat::Unorm12x2,
        offset: 9,
    },
    PackedAttribute {
        semantic: PackedAttributeSemantic::TexCoord,
        format: PackedAttributeFormat::Unorm12x2,
        offset: 12,
    },
    PackedAttribute {
        semantic: PackedAttributeSemantic::TexCoordOffset,
        format: PackedAttributeFormat::Uint4x2,
        offset: 15,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_vertex_byte_layout() {
        let v = PackedVertex {
            position: [0x0201, 0x0403, 0x0605],
            tangent: [7, 8, 9],
            normal: [10, 11, 12],
            tex_coord: [13, 14, 15],
            tex_offset: 16,
        };
        let bytes = v.to_le_bytes();
        let expected: Vec<u8> = (1..=16).collect();
        assert_eq!(bytes.as_slice(), expected.as_slice());
        assert_eq!(PackedVertex::from_le_bytes(&bytes), v);
    }

    #[test]
    fn test_attribute_table_covers_vertex() {
        let mut end = 0;
        for attr in PACKED_VERTEX_ATTRIBUTES {
            assert_eq!(attr.offset as usize, end, "gap before {:?}", attr.semantic);
            end += attr.format.size();
        }
        assert_eq!(end, PackedVertex::SIZE);
    }

    #[test]
    fn test_vertex_bits_distinguish_signed_zero() {
        let a = Vertex::default();
        let mut b = a;
        b.position[0] = -0.0;
        assert_eq!(a, b);
        assert_ne!(a.bits(), b.bits());
    }
}
