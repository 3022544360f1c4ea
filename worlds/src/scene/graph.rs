use super::node::{Node, NodeId};
use crate::core::error::{Result, WorldsError};

#[derive(Debug)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed node tree with a single root. Nodes are moved in through
/// [`Scene::add_child`] and never moved between parents, so every node is
/// reachable from the root exactly once.
#[derive(Debug)]
pub struct Scene {
    slots: Vec<Slot>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: Node::group("root"),
                parent: None,
                children: vec![],
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        // The root always exists
        self.slots.len() == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.slots.len()
    }

    pub fn add_child(&mut self, node: Node, parent: NodeId) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(WorldsError::UnknownNode(parent));
        }

        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: vec![],
        });
        self.slots[parent.0].children.push(id);

        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).map(|slot| &slot.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).map(|slot| &mut slot.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots.get(id.0).and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slots
            .get(id.0)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    /// Depth-first, pre-order walk from the root.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut visited = Vec::with_capacity(self.slots.len());
        let mut stack = vec![self.root()];

        while let Some(id) = stack.pop() {
            visited.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }

        visited
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.slots
            .iter()
            .position(|slot| slot.node.name == name)
            .map(NodeId)
    }
}
