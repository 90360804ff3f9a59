use bytemuck::{Pod, Zeroable};

/// Vertex format shared by every mesh and pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];

    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 4], uv: [f32; 2]) -> Self {
        Self { position, color, uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Buffer usage hint given when a mesh allocates its GPU buffers.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Usage {
    /// Uploaded once, drawn many times.
    #[default]
    Static,
    /// Updated occasionally.
    Dynamic,
    /// Updated every frame.
    Stream,
}

impl Usage {
    /// Whether buffers allocated with this hint accept later updates.
    pub fn is_mutable(self) -> bool {
        !matches!(self, Usage::Static)
    }

    pub(crate) fn buffer_usages(self, base: wgpu::BufferUsages) -> wgpu::BufferUsages {
        if self.is_mutable() {
            base | wgpu::BufferUsages::COPY_DST
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        assert_eq!(Vertex::layout().array_stride, 36);
    }

    #[test]
    fn only_static_buffers_are_immutable() {
        assert!(!Usage::Static.is_mutable());
        assert!(Usage::Dynamic.is_mutable());
        assert!(Usage::Stream.is_mutable());
        assert_eq!(
            Usage::Static.buffer_usages(wgpu::BufferUsages::VERTEX),
            wgpu::BufferUsages::VERTEX
        );
        assert!(Usage::Stream
            .buffer_usages(wgpu::BufferUsages::INDEX)
            .contains(wgpu::BufferUsages::COPY_DST));
    }
}
