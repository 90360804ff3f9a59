use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};

use crate::shader::{ShaderId, UniformLayout, MAX_UNIFORM_BLOCK_SIZE};

use super::graphics::{Graphics, MeshHandle, UniformLocation, UniformSink};

/// Dynamic-offset stride of the uniform arena.
pub(crate) const ARENA_STRIDE: u32 = MAX_UNIFORM_BLOCK_SIZE;

/// CPU-side uniform block of a compiled program.
///
/// Uploads write here; the block keeps its contents across draws and frames.
#[derive(Debug)]
pub(crate) struct ProgramState {
    layout: UniformLayout,
    block: Vec<u8>,
}

impl ProgramState {
    pub(crate) fn new(layout: UniformLayout) -> Self {
        let block = vec![0; layout.size() as usize];
        Self { layout, block }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) struct DrawCall {
    pub program: ShaderId,
    pub mesh: MeshHandle,
    /// Dynamic offset of this draw's uniform block in the arena.
    pub offset: u32,
}

/// Draws and uniform snapshots recorded during one frame.
#[derive(Debug, Default)]
pub(crate) struct FrameRecording {
    pub arena: Vec<u8>,
    pub calls: Vec<DrawCall>,
}

impl FrameRecording {
    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.calls.clear();
    }

    /// Number of arena slots used this frame.
    pub(crate) fn slots(&self) -> usize {
        self.arena.len() / ARENA_STRIDE as usize
    }

    fn push_block(&mut self, block: &[u8]) -> u32 {
        let offset = self.arena.len() as u32;
        self.arena.extend_from_slice(block);
        self.arena.resize((offset + ARENA_STRIDE) as usize, 0);
        offset
    }
}

/// [`Graphics`] implementation that records draws for later submission.
///
/// Each `draw_mesh` snapshots the current program's uniform block into the
/// frame's arena, so later uploads never affect earlier draws.
pub(crate) struct FramePass<'a> {
    programs: &'a mut HashMap<ShaderId, ProgramState>,
    frame: &'a mut FrameRecording,
    current: Option<ShaderId>,
}

impl<'a> FramePass<'a> {
    pub(crate) fn new(
        programs: &'a mut HashMap<ShaderId, ProgramState>,
        frame: &'a mut FrameRecording,
    ) -> Self {
        Self {
            programs,
            frame,
            current: None,
        }
    }

    fn write(&mut self, location: UniformLocation, bytes: &[u8]) {
        let Some(id) = self.current else {
            log::warn!("uniform upload with no program in use");
            return;
        };
        let Some(state) = self.programs.get_mut(&id) else { return };

        let start = location.0 as usize;
        match state.block.get_mut(start..start + bytes.len()) {
            Some(dst) => dst.copy_from_slice(bytes),
            None => log::warn!("{id}: uniform write at {start} outside block"),
        }
    }
}

impl UniformSink for FramePass<'_> {
    fn uniform_location(&mut self, program: ShaderId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.layout.location(name)
    }

    fn uniform_i32(&mut self, location: UniformLocation, value: i32) {
        self.write(location, bytemuck::bytes_of(&value));
    }

    fn uniform_f32(&mut self, location: UniformLocation, value: f32) {
        self.write(location, bytemuck::bytes_of(&value));
    }

    fn uniform_vec2(&mut self, location: UniformLocation, value: Vec2) {
        self.write(location, bytemuck::bytes_of(&value));
    }

    fn uniform_vec3(&mut self, location: UniformLocation, value: Vec3) {
        self.write(location, bytemuck::bytes_of(&value));
    }

    fn uniform_vec4(&mut self, location: UniformLocation, value: Vec4) {
        self.write(location, bytemuck::bytes_of(&value));
    }

    fn uniform_mat4(&mut self, location: UniformLocation, cols: &[f32; 16]) {
        self.write(location, bytemuck::cast_slice(cols));
    }
}

impl Graphics for FramePass<'_> {
    fn use_program(&mut self, program: ShaderId) -> bool {
        if self.programs.contains_key(&program) {
            self.current = Some(program);
            true
        } else {
            false
        }
    }

    fn draw_mesh(&mut self, mesh: MeshHandle) {
        let Some(program) = self.current else {
            log::warn!("draw_mesh with no program in use");
            return;
        };
        let Some(state) = self.programs.get(&program) else { return };

        let offset = self.frame.push_block(&state.block);
        self.frame.calls.push(DrawCall {
            program,
            mesh,
            offset,
        });
    }
}
