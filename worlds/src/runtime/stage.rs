//! The scene-graph capability the choreography talks to, plus a headless
//! implementation that advances actions when the host loop tells it to.

use crate::core::error::{Result, WorldsError};
use crate::core::util::HashMap;
use crate::motion::{MotionAction, Playhead};
use crate::scene::{Node, NodeId, Scene, Transform};

pub trait SceneRuntime {
    fn root(&self) -> NodeId;

    fn add_child(&mut self, node: Node, parent: NodeId) -> Result<NodeId>;

    /// Hands `action` to the runtime. Fire-and-forget: the caller keeps no
    /// reference to it. Several actions may run on one node at once.
    fn apply_action(
        &mut self,
        node: NodeId,
        action: MotionAction,
    ) -> Result<()>;

    /// Cancels every in-flight action, including the ones that loop forever.
    fn remove_all_actions(&mut self);
}

#[derive(Debug)]
struct RunningAction {
    action: MotionAction,
    playhead: Playhead,
}

#[derive(Debug, Default)]
pub struct Stage {
    scene: Scene,
    actions: HashMap<NodeId, Vec<RunningAction>>,
    elapsed: f32,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.scene.node(id)
    }

    pub fn transform(&self, id: NodeId) -> Option<Transform> {
        self.scene.node(id).map(|node| node.transform)
    }

    /// Seconds of scene time advanced since construction.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn action_count(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn actions_on(&self, id: NodeId) -> usize {
        self.actions.get(&id).map_or(0, Vec::len)
    }

    /// Moves every running action forward by `dt` seconds and drops the ones
    /// that finished.
    pub fn advance(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }
        self.elapsed += dt;

        for (id, running) in self.actions.iter_mut() {
            let Some(node) = self.scene.node_mut(*id) else {
                running.clear();
                continue;
            };
            running.retain_mut(|r| {
                !r.playhead
                    .advance(&r.action, &mut node.transform, dt)
                    .is_done()
            });
        }

        self.actions.retain(|_, running| !running.is_empty());
    }

    /// Advances in fixed steps, the way a render loop would, plus one short
    /// step for any remainder. Returns the number of steps taken.
    pub fn advance_by(&mut self, total: f32, step: f32) -> u64 {
        if !total.is_finite() || total <= 0.0 {
            return 0;
        }
        if !step.is_finite() || step <= 0.0 {
            self.advance(total);
            return 1;
        }

        // Counted in f64 so large totals still terminate
        let whole = (total as f64 / step as f64).floor() as u64;
        for _ in 0..whole {
            self.advance(step);
        }

        let remainder = (total as f64 - whole as f64 * step as f64) as f32;
        if remainder > 0.0 {
            self.advance(remainder);
            whole + 1
        } else {
            whole
        }
    }
}

impl SceneRuntime for Stage {
    fn root(&self) -> NodeId {
        self.scene.root()
    }

    fn add_child(&mut self, node: Node, parent: NodeId) -> Result<NodeId> {
        self.scene.add_child(node, parent)
    }

    fn apply_action(
        &mut self,
        node: NodeId,
        action: MotionAction,
    ) -> Result<()> {
        if !self.scene.contains(node) {
            return Err(WorldsError::UnknownNode(node));
        }
        let playhead = Playhead::new(&action);
        self.actions
            .entry(node)
            .or_default()
            .push(RunningAction { action, playhead });
        Ok(())
    }

    fn remove_all_actions(&mut self) {
        self.actions.clear();
    }
}
