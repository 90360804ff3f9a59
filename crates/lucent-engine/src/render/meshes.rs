use wgpu::util::DeviceExt;

use crate::mesh::{Usage, Vertex};

use super::graphics::{MeshHandle, MeshResources};

/// Vertex and index buffers of one mesh.
pub(crate) struct GpuMesh {
    pub vertex: wgpu::Buffer,
    pub index: wgpu::Buffer,
    pub index_count: u32,
    usage: Usage,
}

/// Slot map of GPU meshes addressed by [`MeshHandle`].
#[derive(Default)]
pub(crate) struct MeshStore {
    slots: Vec<Option<GpuMesh>>,
    free: Vec<u32>,
}

impl MeshStore {
    fn insert(&mut self, mesh: GpuMesh) -> MeshHandle {
        match self.free.pop() {
            Some(i) => {
                self.slots[i as usize] = Some(mesh);
                MeshHandle(i)
            }
            None => {
                self.slots.push(Some(mesh));
                MeshHandle(self.slots.len() as u32 - 1)
            }
        }
    }

    pub(crate) fn get(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.slots.get(handle.0 as usize)?.as_ref()
    }

    fn get_mut(&mut self, handle: MeshHandle) -> Option<&mut GpuMesh> {
        self.slots.get_mut(handle.0 as usize)?.as_mut()
    }

    fn remove(&mut self, handle: MeshHandle) -> Option<GpuMesh> {
        let mesh = self.slots.get_mut(handle.0 as usize)?.take()?;
        self.free.push(handle.0);
        Some(mesh)
    }

    pub(crate) fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Drops every buffer still alive. Returns how many meshes were leaked by
    /// their owners.
    pub(crate) fn clear(&mut self) -> usize {
        let leaked = self.live();
        self.slots.clear();
        self.free.clear();
        leaked
    }
}

/// [`MeshResources`] backed by a wgpu device.
pub struct MeshAllocator<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    store: &'a mut MeshStore,
}

impl<'a> MeshAllocator<'a> {
    pub(crate) fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue, store: &'a mut MeshStore) -> Self {
        Self { device, queue, store }
    }

    fn buffers(&self, vertices: &[Vertex], indices: &[u32], usage: Usage) -> (wgpu::Buffer, wgpu::Buffer) {
        let vertex = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lucent mesh vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: usage.buffer_usages(wgpu::BufferUsages::VERTEX),
        });
        let index = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lucent mesh ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: usage.buffer_usages(wgpu::BufferUsages::INDEX),
        });
        (vertex, index)
    }
}

impl MeshResources for MeshAllocator<'_> {
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32], usage: Usage) -> Option<MeshHandle> {
        if vertices.is_empty() || indices.is_empty() {
            log::warn!("refusing to allocate an empty mesh");
            return None;
        }

        let (vertex, index) = self.buffers(vertices, indices, usage);
        let handle = self.store.insert(GpuMesh {
            vertex,
            index,
            index_count: indices.len() as u32,
            usage,
        });
        log::trace!("allocated mesh {} ({} vertices, {usage:?})", handle.0, vertices.len());
        Some(handle)
    }

    fn update_mesh(&mut self, handle: MeshHandle, vertices: &[Vertex], indices: &[u32]) -> bool {
        if vertices.is_empty() || indices.is_empty() {
            return false;
        }
        let usage = match self.store.get(handle) {
            Some(m) if m.usage.is_mutable() => m.usage,
            _ => return false,
        };

        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let index_bytes: &[u8] = bytemuck::cast_slice(indices);

        let fits = self.store.get(handle).is_some_and(|m| {
            vertex_bytes.len() as u64 <= m.vertex.size() && index_bytes.len() as u64 <= m.index.size()
        });

        if fits {
            let Some(mesh) = self.store.get_mut(handle) else { return false };
            self.queue.write_buffer(&mesh.vertex, 0, vertex_bytes);
            self.queue.write_buffer(&mesh.index, 0, index_bytes);
            mesh.index_count = indices.len() as u32;
        } else {
            let (vertex, index) = self.buffers(vertices, indices, usage);
            let Some(mesh) = self.store.get_mut(handle) else { return false };
            mesh.vertex = vertex;
            mesh.index = index;
            mesh.index_count = indices.len() as u32;
        }
        true
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if self.store.remove(handle).is_none() {
            log::warn!("release of unknown mesh {}", handle.0);
        }
    }
}
