//! Scene module
//!
//! Game objects, their transforms, shared models and the render system
//! that draws them.

mod transform;
mod model;
mod game_object;
mod render_system;

pub use transform::{
    ObjectTransform, Transform2d, Transform3d, PushConstantData2d, PushConstantData3d,
};
pub use model::Model;
pub use game_object::{GameObject, GameObject2d, GameObject3d, GameObjectFactory, GameObjectId};
pub use render_system::SimpleRenderSystem;
