//! ECS resources for the camera director.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::geometry::NormRect;
use crate::manager::CameraManager;
use crate::region::SlotId;
use crate::target::TargetId;

/// The camera manager of the running combat scene.
#[derive(Resource, Debug)]
pub struct CameraDirector {
    manager: CameraManager,
    /// Entities behind registered targets, for outbound messages.
    entities: HashMap<TargetId, Entity>,
}

impl CameraDirector {
    pub fn new(manager: CameraManager) -> Self {
        Self {
            manager,
            entities: HashMap::new(),
        }
    }

    pub fn manager(&self) -> &CameraManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut CameraManager {
        &mut self.manager
    }

    pub(crate) fn remember(&mut self, entity: Entity) -> TargetId {
        let id = TargetId::from(entity);
        self.entities.insert(id, entity);
        id
    }

    pub(crate) fn forget(&mut self, entity: Entity) -> TargetId {
        let id = TargetId::from(entity);
        self.entities.remove(&id);
        id
    }

    pub fn entity(&self, id: TargetId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    /// Slot of the region currently framing `entity`.
    pub fn slot_of(&self, entity: Entity) -> Option<SlotId> {
        self.manager.owner_of(TargetId::from(entity))
    }
}

/// Aspect ratio (width / height) of the render target.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScreenAspect(pub f32);

impl Default for ScreenAspect {
    fn default() -> Self {
        Self(16.0 / 9.0)
    }
}

/// Commands that can be sent to the camera director from outside the schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    /// Shake one region.
    Shake {
        slot: SlotId,
        intensity: f32,
        duration: f32,
    },
    /// Shake whichever region currently frames `entity`.
    ShakeEntity {
        entity: Entity,
        intensity: f32,
        duration: f32,
    },
    /// Move the engagement zone (debug/editor repositioning).
    SetEngagementZone(NormRect),
    /// Tear down every region (scene end).
    Clear,
}

/// Thread-safe command queue for UI and debug tooling.
///
/// Clones share the same queue; commands are drained once per frame.
#[derive(Resource, Clone, Default)]
pub struct CameraCommandQueue {
    inner: Arc<Mutex<VecDeque<CameraCommand>>>,
}

impl CameraCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a command to be processed on the next frame.
    pub fn push(&self, command: CameraCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain all pending commands.
    pub fn drain(&self) -> Vec<CameraCommand> {
        self.inner.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_queue_is_shared_between_clones() {
        let queue = CameraCommandQueue::new();
        let handle = queue.clone();

        handle.push(CameraCommand::Clear);
        handle.push(CameraCommand::SetEngagementZone(NormRect::FULL));
        assert!(!queue.is_empty());

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], CameraCommand::Clear);
        assert!(handle.is_empty());
    }
}
