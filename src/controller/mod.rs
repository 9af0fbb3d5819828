// CONTROLLER: Frame loop, collisions and input translation
pub mod collision;
pub mod game_loop;
pub mod input;
pub mod scheduler;

pub use collision::{circles_overlap, is_colliding, is_point_in_entity};
pub use game_loop::{FrameStats, GameLoopController, LoopState};
pub use input::{InputEvent, PointerClick};
pub use scheduler::FrameScheduler;
#[cfg(target_arch = "wasm32")]
pub use scheduler::RafScheduler;
