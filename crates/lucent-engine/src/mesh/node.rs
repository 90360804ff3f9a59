use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::render::{Graphics, MeshResources};
use crate::shader::{ShaderId, ShaderLibrary, ShaderProgram, UniformValue};

use super::vertex::Usage;

/// Identity of a node in a drawable tree.
///
/// Used for parent back-references; never implies ownership. Ids are handed
/// out by a process-wide counter when a node is constructed and are unique
/// for the life of the process, across every tree and thread. The counter
/// holds no engine state, so nodes can be built before the engine runs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Context handed to [`DrawableNode::render`].
pub struct DrawCtx<'a> {
    pub gfx: &'a mut dyn Graphics,
    pub shaders: &'a mut ShaderLibrary,
}

impl<'a> DrawCtx<'a> {
    #[inline]
    pub fn new(gfx: &'a mut dyn Graphics, shaders: &'a mut ShaderLibrary) -> Self {
        Self { gfx, shaders }
    }
}

/// Something that can be drawn: a single mesh or a group of nodes.
///
/// Errors inside these calls (bad uniform values, missing GPU resources) are
/// logged by the node and never abort the caller.
pub trait DrawableNode {
    fn id(&self) -> NodeId;

    fn parent(&self) -> Option<NodeId>;

    fn set_parent(&mut self, parent: Option<NodeId>);

    /// Allocates GPU resources with the given usage hint and binds `shader`.
    fn init(&mut self, res: &mut dyn MeshResources, usage: Usage, shader: &ShaderProgram);

    fn render(&mut self, ctx: &mut DrawCtx<'_>);

    /// Releases GPU resources. Must run before the GPU device is torn down.
    fn cleanup(&mut self, res: &mut dyn MeshResources);

    fn set_shader(&mut self, shader: &ShaderProgram);

    /// Binds the program registered as `name`. Returns `false` if there is none.
    fn set_shader_by_name(&mut self, shaders: &ShaderLibrary, name: &str) -> bool {
        match shaders.by_name(name) {
            Some(program) => {
                self.set_shader(program);
                true
            }
            None => {
                log::error!("{}: no shader named `{name}`", self.id());
                false
            }
        }
    }

    fn shader(&self) -> Option<ShaderId>;

    fn set_param(&mut self, name: &str, value: UniformValue);
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use super::*;
    use crate::mesh::{Mesh, MeshGroup};

    #[test]
    fn node_ids_are_unique_across_trees_and_threads() {
        let spawned: Vec<_> = (0..4)
            .map(|_| {
                thread::spawn(|| {
                    (0..64)
                        .map(|i| {
                            if i % 2 == 0 {
                                MeshGroup::new().id()
                            } else {
                                Mesh::quad(1.0, 1.0, [1.0; 4]).id()
                            }
                        })
                        .collect::<Vec<NodeId>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in spawned {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "{id} handed out twice");
            }
        }
        assert_eq!(seen.len(), 4 * 64);
    }
}
