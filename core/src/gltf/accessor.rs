//! Accessor reading: turns glTF accessors into typed attribute arrays.
//!
//! Every read is bounds-checked against both the buffer view and the
//! resolved buffer, so malformed files produce [`PrimitiveError::Accessor`]
//! instead of a panic.

use gltf_dep::Semantic;
use gltf_dep::accessor::{DataType, Dimensions};
use gltf_dep::mesh::Mode;

use crate::mesh::{Bounds, PrimitiveError, RawPrimitive};

/// Bounds-checked view of one accessor's elements.
struct Elements<'a> {
    bytes: &'a [u8],
    stride: usize,
    element_size: usize,
    count: usize,
}

impl<'a> Elements<'a> {
    fn new(
        accessor: &gltf_dep::Accessor<'_>,
        buffers: &'a [Vec<u8>],
    ) -> Result<Self, PrimitiveError> {
        if accessor.sparse().is_some() {
            return Err(PrimitiveError::Accessor(format!(
                "accessor {} is sparse",
                accessor.index()
            )));
        }
        let view = accessor.view().ok_or_else(|| {
            PrimitiveError::Accessor(format!("accessor {} has no buffer view", accessor.index()))
        })?;
        let buffer_index = view.buffer().index();
        let buffer = buffers.get(buffer_index).ok_or_else(|| {
            PrimitiveError::Accessor(format!("buffer index {buffer_index} out of range"))
        })?;

        let element_size = accessor.data_type().size() * accessor.dimensions().multiplicity();
        let stride = view.stride().unwrap_or(element_size);
        let count = accessor.count();
        let overflow = || {
            PrimitiveError::Accessor(format!("accessor {} byte range overflows", accessor.index()))
        };
        let start = view
            .offset()
            .checked_add(accessor.offset())
            .ok_or_else(overflow)?;
        let end = match count {
            0 => start,
            n => stride
                .checked_mul(n - 1)
                .and_then(|span| span.checked_add(element_size))
                .and_then(|span| span.checked_add(start))
                .ok_or_else(overflow)?,
        };
        let view_end = view
            .offset()
            .checked_add(view.length())
            .ok_or_else(overflow)?;

        if end > view_end || end > buffer.len() {
            return Err(PrimitiveError::Accessor(format!(
                "accessor {} reads bytes {start}..{end}, past the end of its data ({})",
                accessor.index(),
                view_end.min(buffer.len())
            )));
        }

        Ok(Self {
            bytes: &buffer[start..end],
            stride,
            element_size,
            count,
        })
    }

    fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.count).map(move |i| {
            let offset = i * self.stride;
            &self.bytes[offset..offset + self.element_size]
        })
    }
}

fn f32_at(bytes: &[u8], component: usize) -> f32 {
    let o = component * 4;
    f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
}

fn u16_at(bytes: &[u8], component: usize) -> u16 {
    let o = component * 2;
    u16::from_le_bytes([bytes[o], bytes[o + 1]])
}

fn u32_at(bytes: &[u8], component: usize) -> u32 {
    let o = component * 4;
    u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
}

fn unsupported(attribute: &'static str, accessor: &gltf_dep::Accessor<'_>) -> PrimitiveError {
    PrimitiveError::UnsupportedComponentType {
        attribute,
        found: format!(
            "{:?} {:?}{}",
            accessor.data_type(),
            accessor.dimensions(),
            if accessor.normalized() {
                " normalized"
            } else {
                ""
            }
        ),
    }
}

/// Read an index accessor, widening 8/16/32-bit unsigned values to u32.
pub(crate) fn read_indices(
    accessor: &gltf_dep::Accessor<'_>,
    buffers: &[Vec<u8>],
) -> Result<Vec<u32>, PrimitiveError> {
    if accessor.dimensions() != Dimensions::Scalar {
        return Err(unsupported("indices", accessor));
    }
    let elements = Elements::new(accessor, buffers)?;
    match accessor.data_type() {
        DataType::U8 => Ok(elements.iter().map(|e| e[0] as u32).collect()),
        DataType::U16 => Ok(elements.iter().map(|e| u16_at(e, 0) as u32).collect()),
        DataType::U32 => Ok(elements.iter().map(|e| u32_at(e, 0)).collect()),
        _ => Err(unsupported("indices", accessor)),
    }
}

/// Read a float VEC3 accessor (POSITION, NORMAL).
pub(crate) fn read_vec3(
    accessor: &gltf_dep::Accessor<'_>,
    buffers: &[Vec<u8>],
    attribute: &'static str,
) -> Result<Vec<[f32; 3]>, PrimitiveError> {
    if accessor.data_type() != DataType::F32 || accessor.dimensions() != Dimensions::Vec3 {
        return Err(unsupported(attribute, accessor));
    }
    let elements = Elements::new(accessor, buffers)?;
    Ok(elements
        .iter()
        .map(|e| [f32_at(e, 0), f32_at(e, 1), f32_at(e, 2)])
        .collect())
}

/// Read a float VEC4 (or VEC3) TANGENT accessor, keeping xyz.
pub(crate) fn read_tangents(
    accessor: &gltf_dep::Accessor<'_>,
    buffers: &[Vec<u8>],
) -> Result<Vec<[f32; 3]>, PrimitiveError> {
    let dimensions = accessor.dimensions();
    if accessor.data_type() != DataType::F32
        || !matches!(dimensions, Dimensions::Vec3 | Dimensions::Vec4)
    {
        return Err(unsupported("TANGENT", accessor));
    }
    let elements = Elements::new(accessor, buffers)?;
    Ok(elements
        .iter()
        .map(|e| [f32_at(e, 0), f32_at(e, 1), f32_at(e, 2)])
        .collect())
}

fn float2(e: &[u8]) -> [f32; 2] {
    [f32_at(e, 0), f32_at(e, 1)]
}

fn unorm8x2(e: &[u8]) -> [f32; 2] {
    [e[0], e[1]].map(|c| c as f32 / 255.0)
}

fn unorm16x2(e: &[u8]) -> [f32; 2] {
    [u16_at(e, 0), u16_at(e, 1)].map(|c| c as f32 / 65535.0)
}

/// Read a VEC2 texture-coordinate accessor as float.
///
/// Accepts float, normalized u8 (divided by 255) and normalized u16
/// (divided by 65535).
pub(crate) fn read_tex_coords(
    accessor: &gltf_dep::Accessor<'_>,
    buffers: &[Vec<u8>],
) -> Result<Vec<[f32; 2]>, PrimitiveError> {
    if accessor.dimensions() != Dimensions::Vec2 {
        return Err(unsupported("TEXCOORD_0", accessor));
    }
    let normalized = accessor.normalized();
    let elements = Elements::new(accessor, buffers)?;
    let convert: fn(&[u8]) -> [f32; 2] = match accessor.data_type() {
        DataType::F32 => float2,
        DataType::U8 if normalized => unorm8x2,
        DataType::U16 if normalized => unorm16x2,
        _ => return Err(unsupported("TEXCOORD_0", accessor)),
    };
    Ok(elements.iter().map(convert).collect())
}

/// Bounds declared by an accessor's `min`/`max`, if both are three numbers.
pub(crate) fn declared_bounds(accessor: &gltf_dep::Accessor<'_>) -> Option<Bounds> {
    fn vec3(value: gltf_dep::json::Value) -> Option<[f32; 3]> {
        let array = value.as_array()?;
        if array.len() != 3 {
            return None;
        }
        let mut out = [0.0; 3];
        for (slot, v) in out.iter_mut().zip(array) {
            *slot = v.as_f64()? as f32;
        }
        Some(out)
    }

    let min = vec3(accessor.min()?)?;
    let max = vec3(accessor.max()?)?;
    Some(Bounds::from_min_max(min, max))
}

/// Extract every attribute the pipeline needs from one primitive.
///
/// POSITION, NORMAL and TEXCOORD_0 are required. Primitives without an
/// index accessor get the sequential list `0..vertex_count`.
pub(crate) fn extract_primitive(
    primitive: &gltf_dep::Primitive<'_>,
    buffers: &[Vec<u8>],
) -> Result<RawPrimitive, PrimitiveError> {
    if primitive.mode() != Mode::Triangles {
        return Err(PrimitiveError::UnsupportedTopology(format!(
            "{:?}",
            primitive.mode()
        )));
    }

    let position_accessor = primitive
        .get(&Semantic::Positions)
        .ok_or(PrimitiveError::MissingAttribute("POSITION"))?;
    let normal_accessor = primitive
        .get(&Semantic::Normals)
        .ok_or(PrimitiveError::MissingAttribute("NORMAL"))?;
    let tex_coord_accessor = primitive
        .get(&Semantic::TexCoords(0))
        .ok_or(PrimitiveError::MissingAttribute("TEXCOORD_0"))?;

    let positions = read_vec3(&position_accessor, buffers, "POSITION")?;
    let normals = read_vec3(&normal_accessor, buffers, "NORMAL")?;
    let tex_coords = read_tex_coords(&tex_coord_accessor, buffers)?;
    let tangents = primitive
        .get(&Semantic::Tangents)
        .map(|accessor| read_tangents(&accessor, buffers))
        .transpose()?;

    let indices = match primitive.indices() {
        Some(accessor) => read_indices(&accessor, buffers)?,
        None => (0..positions.len() as u32).collect(),
    };

    let raw = RawPrimitive {
        indices,
        positions,
        normals,
        tex_coords,
        tangents,
        declared_bounds: declared_bounds(&position_accessor),
        material: primitive.material().index(),
    };
    raw.check_counts()?;
    Ok(raw)
}
