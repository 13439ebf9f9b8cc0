//! Vertex attribute methods for `GlrGltfBuilder`

use super::super::types::{
    ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER, FLOAT, GltfAccessor, GltfBufferView, UNSIGNED_INT,
    UNSIGNED_SHORT,
};
use super::GlrGltfBuilder;

fn accessor_type(components: usize) -> &'static str {
    match components {
        1 => "SCALAR",
        2 => "VEC2",
        3 => "VEC3",
        _ => "VEC4",
    }
}

impl GlrGltfBuilder {
    /// Write `N`-component float vectors and return the accessor index.
    fn add_float_vectors<const N: usize>(&mut self, values: &[[f32; N]], bounds: bool) -> usize {
        self.align(4);
        let byte_offset = self.buffer.len();

        let mut min = [f32::MAX; N];
        let mut max = [f32::MIN; N];

        for value in values {
            for (i, &v) in value.iter().enumerate() {
                min[i] = min[i].min(v);
                max[i] = max[i].max(v);
                self.buffer.extend_from_slice(&v.to_le_bytes());
            }
        }

        let bv_idx = self.buffer_views.len();
        self.buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: values.len() * N * 4,
            target: Some(ARRAY_BUFFER),
        });

        let acc_idx = self.accessors.len();
        self.accessors.push(GltfAccessor {
            buffer_view: bv_idx,
            component_type: FLOAT,
            count: values.len(),
            accessor_type: accessor_type(N).to_string(),
            min: bounds.then(|| min.to_vec()),
            max: bounds.then(|| max.to_vec()),
        });

        acc_idx
    }

    /// Positions carry min/max, as glTF requires.
    pub(super) fn add_positions(&mut self, positions: &[[f32; 3]]) -> usize {
        self.add_float_vectors(positions, true)
    }

    pub(super) fn add_texcoords(&mut self, uvs: &[[f32; 2]]) -> usize {
        self.add_float_vectors(uvs, false)
    }

    pub(super) fn add_colors(&mut self, colors: &[[f32; 4]]) -> usize {
        self.add_float_vectors(colors, false)
    }

    pub(super) fn add_scalars(&mut self, values: &[f32]) -> usize {
        let wrapped: Vec<[f32; 1]> = values.iter().map(|&v| [v]).collect();
        self.add_float_vectors(&wrapped, false)
    }

    pub(super) fn add_indices(&mut self, indices: &[u32]) -> usize {
        let byte_offset;
        let byte_length;
        let component_type;

        // 65535 is the primitive restart value for 16-bit indices
        if indices.iter().any(|&i| i >= u32::from(u16::MAX)) {
            self.align(4);
            byte_offset = self.buffer.len();
            for &idx in indices {
                self.buffer.extend_from_slice(&idx.to_le_bytes());
            }
            byte_length = indices.len() * 4;
            component_type = UNSIGNED_INT;
        } else {
            self.align(2);
            byte_offset = self.buffer.len();
            for &idx in indices {
                self.buffer.extend_from_slice(&(idx as u16).to_le_bytes());
            }
            byte_length = indices.len() * 2;
            component_type = UNSIGNED_SHORT;
        }

        let bv_idx = self.buffer_views.len();
        self.buffer_views.push(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length,
            target: Some(ELEMENT_ARRAY_BUFFER),
        });

        let acc_idx = self.accessors.len();
        self.accessors.push(GltfAccessor {
            buffer_view: bv_idx,
            component_type,
            count: indices.len(),
            accessor_type: "SCALAR".to_string(),
            min: None,
            max: None,
        });

        acc_idx
    }
}
