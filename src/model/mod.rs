// MODEL: Entities, key state and the background contract
pub mod entity;
pub mod keys;
pub mod universe;

pub use entity::{entity_ref, Commands, Entity, EntityKind, EntityRef, EntityView, EventContext};
pub use keys::KeyState;
pub use universe::Universe;
