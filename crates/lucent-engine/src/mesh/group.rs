use crate::render::MeshResources;
use crate::shader::{ShaderId, ShaderProgram, UniformValue};

use super::node::{DrawCtx, DrawableNode, NodeId};
use super::vertex::Usage;

/// A node that owns an ordered list of child nodes and forwards every call
/// to each of them.
///
/// Children are drawn in insertion order. Shader and parameter changes are
/// broadcast; [`shader`](DrawableNode::shader) reports the first child's
/// program, which is only meaningful when all children share one.
pub struct MeshGroup {
    id: NodeId,
    parent: Option<NodeId>,
    children: Vec<Box<dyn DrawableNode>>,
}

impl MeshGroup {
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Appends `node` and makes this group its parent.
    pub fn add_child(&mut self, mut node: Box<dyn DrawableNode>) -> NodeId {
        node.set_parent(Some(self.id));
        let id = node.id();
        self.children.push(node);
        id
    }

    pub fn push<N>(&mut self, node: N) -> NodeId
    where
        N: DrawableNode + 'static,
    {
        self.add_child(Box::new(node))
    }

    /// Detaches the direct child `id`, clearing its parent.
    pub fn remove_child(&mut self, id: NodeId) -> Option<Box<dyn DrawableNode>> {
        let index = self.children.iter().position(|c| c.id() == id)?;
        let mut node = self.children.remove(index);
        node.set_parent(None);
        Some(node)
    }

    pub fn child(&self, id: NodeId) -> Option<&dyn DrawableNode> {
        self.children.iter().find(|c| c.id() == id).map(|c| c.as_ref())
    }

    pub fn child_mut(&mut self, id: NodeId) -> Option<&mut (dyn DrawableNode + 'static)> {
        self.children.iter_mut().find(|c| c.id() == id).map(|c| c.as_mut())
    }

    pub fn children(&self) -> impl Iterator<Item = &dyn DrawableNode> {
        self.children.iter().map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Default for MeshGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawableNode for MeshGroup {
    fn id(&self) -> NodeId {
        self.id
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    fn init(&mut self, res: &mut dyn MeshResources, usage: Usage, shader: &ShaderProgram) {
        for child in &mut self.children {
            child.init(res, usage, shader);
        }
    }

    fn render(&mut self, ctx: &mut DrawCtx<'_>) {
        for child in &mut self.children {
            child.render(ctx);
        }
    }

    fn cleanup(&mut self, res: &mut dyn MeshResources) {
        for child in &mut self.children {
            child.cleanup(res);
        }
    }

    fn set_shader(&mut self, shader: &ShaderProgram) {
        for child in &mut self.children {
            child.set_shader(shader);
        }
    }

    fn shader(&self) -> Option<ShaderId> {
        self.children.first().and_then(|c| c.shader())
    }

    fn set_param(&mut self, name: &str, value: UniformValue) {
        for child in &mut self.children {
            child.set_param(name, value);
        }
    }
}
