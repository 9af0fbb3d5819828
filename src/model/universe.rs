use crate::model::Entity;
use crate::view::Surface;

/// Background renderer. Gets the player for parallax/camera offsets.
pub trait Universe {
    fn render_background(&mut self, surface: &mut dyn Surface, player: Option<&dyn Entity>);
}
