//! # Vertex Streams
//!
//! Meshes keep positions, normals and texture coordinates in three separate
//! vertex buffers. The layouts below describe those streams to the scene
//! pipeline at shader locations 0, 1 and 2.

/// Position stream: `[x, y, z]` at shader location 0
pub fn position_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Normal stream: `[nx, ny, nz]` at shader location 1, not necessarily unit length
pub fn normal_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// Texture coordinate stream: `[u, v]` at shader location 2
pub fn uv_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

/// All three streams in slot order
pub fn stream_layouts() -> [wgpu::VertexBufferLayout<'static>; 3] {
    [position_desc(), normal_desc(), uv_desc()]
}
