use std::num::NonZeroU64;

use super::pass::ARENA_STRIDE;

/// Binding size of the uniform arena: one block.
const BINDING_SIZE: NonZeroU64 = match NonZeroU64::new(ARENA_STRIDE as u64) {
    Some(n) => n,
    None => panic!("arena stride must be non-zero"),
};

/// Layout shared by every program: one uniform block at `@group(0) @binding(0)`
/// addressed with a dynamic offset.
pub(crate) fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("lucent uniform bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: Some(BINDING_SIZE),
            },
            count: None,
        }],
    })
}

/// GPU buffer receiving each frame's uniform snapshots.
pub(crate) struct UniformArena {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
}

impl UniformArena {
    const MIN_SLOTS: usize = 64;

    pub(crate) fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout) -> Self {
        Self::with_slots(device, layout, Self::MIN_SLOTS)
    }

    fn with_slots(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, slots: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lucent uniform arena"),
            size: (slots * ARENA_STRIDE as usize) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lucent uniform arena bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: Some(BINDING_SIZE),
                }),
            }],
        });

        Self {
            buffer,
            bind_group,
            capacity: slots,
        }
    }

    /// Grows the arena so it holds at least `slots` blocks.
    pub(crate) fn ensure_capacity(
        &mut self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        slots: usize,
    ) {
        if slots <= self.capacity {
            return;
        }
        let new_cap = slots.next_power_of_two().max(Self::MIN_SLOTS);
        log::debug!("growing uniform arena {} -> {new_cap} slots", self.capacity);
        *self = Self::with_slots(device, layout, new_cap);
    }

    pub(crate) fn upload(&self, queue: &wgpu::Queue, bytes: &[u8]) {
        if !bytes.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
