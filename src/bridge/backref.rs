use std::{collections::HashMap, sync::Arc};

use bevy_ecs::entity::Entity;
use parking_lot::RwLock;

use crate::utils::allocator::BodyHandle;

/// Links a scene body back to the entity that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackReference {
    pub entity: Entity,
}

/// Side-table from body handle to owning entity.
#[derive(Debug, Default)]
pub struct BackReferenceTable {
    entries: HashMap<BodyHandle, BackReference>,
}

/// Shared between the frame thread (writes) and the contact callback (reads).
pub type SharedBackReferences = Arc<RwLock<BackReferenceTable>>;

impl BackReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedBackReferences {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn insert(&mut self, handle: BodyHandle, entity: Entity) -> Option<BackReference> {
        self.entries.insert(handle, BackReference { entity })
    }

    pub fn get(&self, handle: BodyHandle) -> Option<BackReference> {
        self.entries.get(&handle).copied()
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<BackReference> {
        self.entries.remove(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::allocator::GenerationalId;

    #[test]
    fn entries_are_keyed_by_generation() {
        let mut table = BackReferenceTable::new();
        let entity = bevy_ecs::world::World::new().spawn_empty().id();
        let old = BodyHandle(GenerationalId::new(3, 0));
        let reused = BodyHandle(GenerationalId::new(3, 1));

        table.insert(old, entity);
        assert_eq!(table.get(old), Some(BackReference { entity }));
        assert_eq!(table.get(reused), None);
        assert_eq!(table.remove(old), Some(BackReference { entity }));
        assert!(table.is_empty());
    }
}
