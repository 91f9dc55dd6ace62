/// Game objects: a shared model, a color and a transform

use std::sync::Arc;
use glam::Vec3;
use crate::scene::{Model, ObjectTransform, Transform2d, Transform3d};

/// Unique, monotonically increasing object id
pub type GameObjectId = u32;

/// A drawable scene object
///
/// Objects without a model are kept in the scene but skipped at draw time.
/// Not `Clone`: every object owns its id.
pub struct GameObject<T: ObjectTransform> {
    id: GameObjectId,
    pub model: Option<Arc<Model>>,
    pub color: Vec3,
    pub transform: T,
}

impl<T: ObjectTransform> GameObject<T> {
    pub fn id(&self) -> GameObjectId {
        self.id
    }
}

pub type GameObject2d = GameObject<Transform2d>;
pub type GameObject3d = GameObject<Transform3d>;

/// Hands out game objects with increasing ids
///
/// One factory per scene; ids are unique within a factory.
#[derive(Debug, Default)]
pub struct GameObjectFactory {
    next_id: GameObjectId,
}

impl GameObjectFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// New object with no model, black color and the default transform
    pub fn create<T: ObjectTransform>(&mut self) -> GameObject<T> {
        let id = self.next_id;
        self.next_id += 1;
        GameObject {
            id,
            model: None,
            color: Vec3::ZERO,
            transform: T::default(),
        }
    }

    /// Number of objects created so far
    pub fn created(&self) -> u32 {
        self.next_id
    }
}

#[cfg(test)]
#[path = "game_object_tests.rs"]
mod tests;
