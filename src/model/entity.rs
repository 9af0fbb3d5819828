use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;

use crate::model::KeyState;
use crate::view::Surface;

/// Shared handle to a live entity. Identity is pointer identity.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Wrap a concrete entity into a shared handle.
pub fn entity_ref<E: Entity + 'static>(entity: E) -> EntityRef {
    Rc::new(RefCell::new(entity))
}

/// Coarse variant tag so collision handlers can react to what they hit
/// without downcasting. Games number their own kinds with `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum EntityKind {
    Player,
    Custom(u32),
    #[default]
    Other,
}

/// A positioned game object with a circular collision shape.
pub trait Entity {
    /// Advance one frame. `keys` is only `Some` for the player.
    fn update(&mut self, delta: f64, keys: Option<&KeyState>, world: &mut EntityView<'_>);

    fn render(&self, surface: &mut dyn Surface);

    fn position(&self) -> DVec2;

    fn radius(&self) -> f64;

    fn kind(&self) -> EntityKind {
        EntityKind::Other
    }

    fn on_collision(&mut self, _other: &dyn Entity, _events: &mut EventContext<'_>) {}

    fn is_clickable(&self) -> bool {
        false
    }

    fn on_click(&mut self, _events: &mut EventContext<'_>) {}
}

/// Collection changes requested from entity callbacks. Applied by the
/// controller after the update pass, after the collision pass, and after
/// each click.
#[derive(Default)]
pub struct Commands {
    spawned: Vec<EntityRef>,
    despawned: Vec<EntityRef>,
}

impl Commands {
    pub fn spawn(&mut self, entity: EntityRef) {
        self.spawned.push(entity);
    }

    pub fn despawn(&mut self, entity: &EntityRef) {
        self.despawned.push(entity.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.despawned.is_empty()
    }

    pub(crate) fn take(&mut self) -> (Vec<EntityRef>, Vec<EntityRef>) {
        (std::mem::take(&mut self.spawned), std::mem::take(&mut self.despawned))
    }
}

/// What an entity sees of the world during its update: every other entity,
/// read-only, plus a command queue.
pub struct EntityView<'a> {
    entities: &'a [EntityRef],
    current: Option<usize>,
    commands: &'a mut Commands,
}

impl<'a> EntityView<'a> {
    pub(crate) fn new(entities: &'a [EntityRef], current: Option<usize>, commands: &'a mut Commands) -> Self {
        Self { entities, current, commands }
    }

    /// Entities other than the one being updated, in collection order.
    pub fn others(&self) -> impl Iterator<Item = &EntityRef> + '_ {
        let current = self.current;
        self.entities
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != current)
            .map(|(_, e)| e)
    }

    /// Number of entities in the collection, the updating one included.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn spawn(&mut self, entity: EntityRef) {
        self.commands.spawn(entity);
    }

    pub fn despawn(&mut self, entity: &EntityRef) {
        self.commands.despawn(entity);
    }

    /// Queue removal of the entity being updated. No-op for the player,
    /// which is not part of the collection.
    pub fn despawn_self(&mut self) {
        if let Some(entity) = self.current.and_then(|i| self.entities.get(i)) {
            self.commands.despawn(entity);
        }
    }
}

/// Handed to `on_collision` and `on_click`. The entity receiving the event
/// is mutably borrowed, so only its identity is kept here.
pub struct EventContext<'a> {
    this: &'a EntityRef,
    commands: &'a mut Commands,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(this: &'a EntityRef, commands: &'a mut Commands) -> Self {
        Self { this, commands }
    }

    pub fn spawn(&mut self, entity: EntityRef) {
        self.commands.spawn(entity);
    }

    /// Queue removal of the entity receiving the event.
    pub fn despawn_self(&mut self) {
        self.commands.despawn(self.this);
    }
}
