//! In-memory glTF fixtures for loader tests.


pub(super) const FLOAT: u32 = 5126;
pub(super) const UNSIGNED_BYTE: u32 = 5121;
pub(super) const UNSIGNED_SHORT: u32 = 5123;
pub(super) const UNSIGNED_INT: u32 = 5125;

pub(super) const MODE_POINTS: u32 = 0;

/// Unit quad in the XY plane: positions, normals and texture coordinates.
pub(super) const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
];
pub(super) const QUAD_NORMALS: [[f32; 3]; 4] = [[0.0, 0.0, 1.0]; 4];
pub(super) const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
pub(super) const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Assembles a glTF document plus its single binary buffer.
///
/// Every `add_*` method returns the index of the created object.
#[derive(Default)]
pub(super) struct GltfBuilder {
    bin: Vec<u8>,
    views: Vec<String>,
    accessors: Vec<String>,
    meshes: Vec<String>,
    nodes: Vec<String>,
    scenes: Vec<String>,
    materials: usize,
}

impl GltfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` as a buffer view, 4-byte aligned.
    pub fn add_view(&mut self, bytes: &[u8], stride: Option<usize>) -> usize {
        self.bin.resize(self.bin.len().next_multiple_of(4), 0);
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        let stride = stride
            .map(|s| format!(r#","byteStride":{s}"#))
            .unwrap_or_default();
        self.views.push(format!(
            r#"{{"buffer":0,"byteOffset":{offset},"byteLength":{}{stride}}}"#,
            bytes.len()
        ));
        self.views.len() - 1
    }

    pub fn add_accessor(
        &mut self,
        view: usize,
        component_type: u32,
        count: usize,
        ty: &str,
        normalized: bool,
        min_max: Option<([f32; 3], [f32; 3])>,
    ) -> usize {
        let normalized = if normalized {
            r#","normalized":true"#
        } else {
            ""
        };
        let bounds = min_max
            .map(|(min, max)| format!(r#","min":{min:?},"max":{max:?}"#))
            .unwrap_or_default();
        self.accessors.push(format!(
            r#"{{"bufferView":{view},"componentType":{component_type},"count":{count},"type":"{ty}"{normalized}{bounds}}}"#
        ));
        self.accessors.len() - 1
    }

    /// POSITION accessor with min/max computed from the data.
    pub fn add_positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        self.add_positions_with_bounds(positions, min, max)
    }

    pub fn add_positions_with_bounds(
        &mut self,
        positions: &[[f32; 3]],
        min: [f32; 3],
        max: [f32; 3],
    ) -> usize {
        let view = self.add_view(&f32_bytes(positions.as_flattened()), None);
        let bounds = Some((min, max));
        self.add_accessor(view, FLOAT, positions.len(), "VEC3", false, bounds)
    }

    pub fn add_vec3(&mut self, values: &[[f32; 3]]) -> usize {
        let view = self.add_view(&f32_bytes(values.as_flattened()), None);
        self.add_accessor(view, FLOAT, values.len(), "VEC3", false, None)
    }

    pub fn add_vec4(&mut self, values: &[[f32; 4]]) -> usize {
        let view = self.add_view(&f32_bytes(values.as_flattened()), None);
        self.add_accessor(view, FLOAT, values.len(), "VEC4", false, None)
    }

    pub fn add_vec2(&mut self, values: &[[f32; 2]]) -> usize {
        let view = self.add_view(&f32_bytes(values.as_flattened()), None);
        self.add_accessor(view, FLOAT, values.len(), "VEC2", false, None)
    }

    /// Normalized u8 texture coordinates, padded to a 4-byte stride.
    pub fn add_tex_coords_u8(&mut self, values: &[[u8; 2]]) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|t| [t[0], t[1], 0, 0]).collect();
        let view = self.add_view(&bytes, Some(4));
        self.add_accessor(view, UNSIGNED_BYTE, values.len(), "VEC2", true, None)
    }

    pub fn add_tex_coords_u16(&mut self, values: &[[u16; 2]]) -> usize {
        let bytes: Vec<u8> = values
            .iter()
            .flat_map(|t| t.iter().flat_map(|c| c.to_le_bytes()))
            .collect();
        let view = self.add_view(&bytes, None);
        self.add_accessor(view, UNSIGNED_SHORT, values.len(), "VEC2", true, None)
    }

    /// Index accessor stored with the given component type.
    pub fn add_indices(&mut self, indices: &[u32], component_type: u32) -> usize {
        let bytes: Vec<u8> = match component_type {
            UNSIGNED_BYTE => indices.iter().map(|&i| i as u8).collect(),
            UNSIGNED_SHORT => indices
                .iter()
                .flat_map(|&i| (i as u16).to_le_bytes())
                .collect(),
            _ => indices.iter().flat_map(|i| i.to_le_bytes()).collect(),
        };
        let view = self.add_view(&bytes, None);
        self.add_accessor(view, component_type, indices.len(), "SCALAR", false, None)
    }

    /// Add the standard quad attributes and return the primitive JSON.
    pub fn quad_primitive(&mut self, index_type: Option<u32>) -> String {
        let position = self.add_positions(&QUAD_POSITIONS);
        let normal = self.add_vec3(&QUAD_NORMALS);
        let tex_coord = self.add_vec2(&QUAD_TEX_COORDS);
        let indices = index_type.map(|ty| self.add_indices(&QUAD_INDICES, ty));
        primitive(
            &[
                ("POSITION", position),
                ("NORMAL", normal),
                ("TEXCOORD_0", tex_coord),
            ],
            indices,
            None,
        )
    }

    pub fn add_material(&mut self) -> usize {
        self.materials += 1;
        self.materials - 1
    }

    pub fn add_mesh(&mut self, name: &str, primitives: &[String]) -> usize {
        self.meshes.push(format!(
            r#"{{"name":"{name}","primitives":[{}]}}"#,
            primitives.join(",")
        ));
        self.meshes.len() - 1
    }

    /// Add a node from its JSON body, e.g. `"mesh":0,"translation":[1,2,3]`.
    pub fn add_node(&mut self, body: &str) -> usize {
        self.nodes.push(format!("{{{body}}}"));
        self.nodes.len() - 1
    }

    pub fn add_scene(&mut self, nodes: &[usize]) -> usize {
        self.scenes.push(format!(r#"{{"nodes":{nodes:?}}}"#));
        self.scenes.len() - 1
    }

    /// Binary buffer contents, padded to 4 bytes.
    pub fn bin(&self) -> Vec<u8> {
        let mut bin = self.bin.clone();
        bin.resize(bin.len().next_multiple_of(4), 0);
        bin
    }

    /// Document JSON. `uri` is the buffer URI; `None` references the GLB blob.
    pub fn json(&self, uri: Option<&str>) -> String {
        let bin_len = self.bin().len();
        let uri = uri.map(|u| format!(r#","uri":"{u}""#)).unwrap_or_default();

        let mut parts = vec![
            r#""asset":{"version":"2.0"}"#.to_string(),
            format!(r#""buffers":[{{"byteLength":{bin_len}{uri}}}]"#),
        ];
        let mut push = |key: &str, items: &[String]| {
            if !items.is_empty() {
                parts.push(format!(r#""{key}":[{}]"#, items.join(",")));
            }
        };
        push("bufferViews", &self.views);
        push("accessors", &self.accessors);
        push("meshes", &self.meshes);
        push("nodes", &self.nodes);
        push("scenes", &self.scenes);
        push("materials", &vec!["{}".to_string(); self.materials]);
        if !self.scenes.is_empty() {
            parts.push(r#""scene":0"#.to_string());
        }
        format!("{{{}}}", parts.join(","))
    }

    /// Binary glTF with the buffer in the `BIN` chunk.
    pub fn build_glb(&self) -> Vec<u8> {
        glb(self.json(None).as_bytes(), &self.bin())
    }

    /// JSON glTF with the buffer embedded as a base64 data URI.
    pub fn build_embedded(&self) -> Vec<u8> {
        let uri = format!(
            "data:application/octet-stream;base64,{}",
            base64_encode(&self.bin())
        );
        self.json(Some(&uri)).into_bytes()
    }
}

/// JSON for one primitive.
pub(super) fn primitive(
    attributes: &[(&str, usize)],
    indices: Option<usize>,
    mode: Option<u32>,
) -> String {
    let attributes: Vec<String> = attributes
        .iter()
        .map(|(name, accessor)| format!(r#""{name}":{accessor}"#))
        .collect();
    let indices = indices
        .map(|i| format!(r#","indices":{i}"#))
        .unwrap_or_default();
    let mode = mode.map(|m| format!(r#","mode":{m}"#)).unwrap_or_default();
    format!(
        r#"{{"attributes":{{{}}}{indices}{mode}}}"#,
        attributes.join(",")
    )
}

/// Add `"material":index` to primitive JSON produced by [`primitive`].
pub(super) fn with_material(primitive: &str, material: usize) -> String {
    let body = primitive.strip_suffix('}').unwrap_or(primitive);
    format!(r#"{body},"material":{material}}}"#)
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Binary glTF container: 12-byte header, JSON chunk, BIN chunk.
pub(super) fn glb(json: &[u8], bin: &[u8]) -> Vec<u8> {
    let json_pad = (4 - (json.len() % 4)) % 4;
    let json_chunk_len = json.len() + json_pad;
    let bin_pad = (4 - (bin.len() % 4)) % 4;
    let bin_chunk_len = bin.len() + bin_pad;
    let total_length = 12 + 8 + json_chunk_len + 8 + bin_chunk_len;

    let mut out = Vec::with_capacity(total_length);
    out.extend_from_slice(&0x46546C67u32.to_le_bytes()); // magic "glTF"
    out.extend_from_slice(&2u32.to_le_bytes()); // version
    out.extend_from_slice(&(total_length as u32).to_le_bytes());

    out.extend_from_slice(&(json_chunk_len as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    out.extend_from_slice(json);
    out.extend(std::iter::repeat_n(b' ', json_pad));

    out.extend_from_slice(&(bin_chunk_len as u32).to_le_bytes());
    out.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    out.extend_from_slice(bin);
    out.extend(std::iter::repeat_n(0u8, bin_pad));
    out
}

fn base64_encode(data: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
    for chunk in data.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let n = (b[0] as u32) << 16 | (b[1] as u32) << 8 | b[2] as u32;
        for i in 0..4 {
            if i <= chunk.len() {
                out.push(TABLE[(n >> (18 - 6 * i) & 0x3f) as usize] as char);
            } else {
                out.push('=');
            }
        }
    }
    out
}

/// Parse fixture bytes and resolve buffers the way the loader does.
pub(super) fn parse(data: &[u8]) -> (gltf_dep::Document, Vec<Vec<u8>>) {
    let gltf = gltf_dep::Gltf::from_slice(data).expect("fixture should parse");
    let buffers = super::loader::resolve_buffers(&gltf.document, gltf.blob, None)
        .expect("fixture buffers should resolve");
    (gltf.document, buffers)
}
