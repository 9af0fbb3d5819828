use std::rc::Rc;

use tracing::{debug, error, info, trace, warn};

use crate::config::EngineConfig;
use crate::controller::collision::{dispatch_collisions, is_point_in_entity};
use crate::controller::input::{InputEvent, PointerClick};
use crate::controller::FrameScheduler;
use crate::error::EngineResult;
use crate::model::{Commands, EntityRef, EntityView, EventContext, KeyState, Universe};
use crate::view::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Running totals since the controller was built.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub last_delta: f64,
    /// Sum of all deltas, in seconds.
    pub elapsed: f64,
    /// Colliding pairs found in the last frame.
    pub last_collisions: usize,
}

/// Owns the live entities and drives update, collision and render once per
/// host frame.
pub struct GameLoopController {
    surface: Box<dyn Surface>,
    scheduler: Box<dyn FrameScheduler>,
    config: EngineConfig,
    entities: Vec<EntityRef>,
    player: Option<EntityRef>,
    universe: Option<Box<dyn Universe>>,
    keys: KeyState,
    commands: Commands,
    state: LoopState,
    last_time: f64,
    first_frame: bool,
    stats: FrameStats,
}

impl GameLoopController {
    pub fn new(surface: Box<dyn Surface>, scheduler: Box<dyn FrameScheduler>, config: EngineConfig) -> Self {
        Self {
            surface,
            scheduler,
            config,
            entities: Vec::new(),
            player: None,
            universe: None,
            keys: KeyState::new(),
            commands: Commands::default(),
            state: LoopState::Stopped,
            last_time: 0.0,
            first_frame: false,
            stats: FrameStats::default(),
        }
    }

    /// Begin ticking. `now` is the host clock in milliseconds. Returns
    /// `Ok(false)` when already running; no second frame chain is started.
    pub fn start(&mut self, now: f64) -> EngineResult<bool> {
        if self.is_running() {
            debug!("start ignored, loop already running");
            return Ok(false);
        }
        self.state = LoopState::Running;
        self.last_time = now;
        self.first_frame = true;
        if let Err(err) = self.scheduler.request_frame() {
            self.state = LoopState::Stopped;
            return Err(err);
        }
        info!(entities = self.entities.len(), "game loop started");
        Ok(true)
    }

    /// Clear the running flag. A frame already requested still fires but
    /// returns before doing any work.
    pub fn stop(&mut self) {
        if self.is_running() {
            info!(frames = self.stats.frames, "game loop stopped");
        }
        self.state = LoopState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// One host frame: delta, update, render, reschedule.
    pub fn tick(&mut self, timestamp: f64) {
        if !self.is_running() {
            trace!("tick after stop, exiting frame chain");
            return;
        }

        let delta = self.frame_delta(timestamp);
        self.update(delta);
        self.render();
        self.record_frame(delta);

        if let Err(err) = self.scheduler.request_frame() {
            error!(%err, "could not schedule next frame, stopping loop");
            self.state = LoopState::Stopped;
        }
    }

    fn frame_delta(&mut self, timestamp: f64) -> f64 {
        let mut delta = ((timestamp - self.last_time) / 1000.0).max(0.0);
        self.last_time = timestamp;
        if std::mem::take(&mut self.first_frame) && self.config.clamp_first_delta {
            delta = 0.0;
        }
        if let Some(max) = self.config.max_delta {
            delta = delta.min(max);
        }
        delta
    }

    fn record_frame(&mut self, delta: f64) {
        self.stats.frames += 1;
        self.stats.last_delta = delta;
        self.stats.elapsed += delta;

        let interval = self.config.stats_log_interval;
        if interval > 0 && self.stats.frames % interval == 0 {
            debug!(
                frames = self.stats.frames,
                elapsed = self.stats.elapsed,
                entities = self.entities.len(),
                collisions = self.stats.last_collisions,
                "frame stats"
            );
        }
    }

    /// Update the player, then every entity present when the pass began,
    /// then apply queued spawns/despawns and run the collision pass. Commands
    /// queued by collision handlers are applied after the pass.
    pub fn update(&mut self, delta: f64) {
        if let Some(player) = &self.player {
            let mut view = EntityView::new(&self.entities, None, &mut self.commands);
            player.borrow_mut().update(delta, Some(&self.keys), &mut view);
        }

        let count = self.entities.len();
        for i in 0..count {
            let entity = self.entities[i].clone();
            let mut view = EntityView::new(&self.entities, Some(i), &mut self.commands);
            entity.borrow_mut().update(delta, None, &mut view);
        }

        self.apply_commands();
        self.stats.last_collisions =
            dispatch_collisions(self.player.as_ref(), &self.entities, &mut self.commands);
        self.apply_commands();
    }

    // Spawns first, so spawn + despawn in one frame leaves nothing behind.
    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let (spawned, despawned) = self.commands.take();
        for entity in spawned {
            self.add_entity(entity);
        }
        for entity in &despawned {
            self.remove_entity(entity);
        }
    }

    /// Clear, background, entities in order, player on top.
    pub fn render(&mut self) {
        let surface = self.surface.as_mut();
        surface.clear();
        surface.fill(&self.config.background_color);

        if let Some(universe) = self.universe.as_mut() {
            let player = self.player.as_ref().map(|p| p.borrow());
            universe.render_background(&mut *surface, player.as_deref());
        }

        for entity in &self.entities {
            entity.borrow().render(&mut *surface);
        }

        if let Some(player) = &self.player {
            player.borrow().render(&mut *surface);
        }
    }

    /// Append an entity. Refuses the current player and handles already in
    /// the collection.
    pub fn add_entity(&mut self, entity: EntityRef) -> bool {
        if self.player.as_ref().is_some_and(|p| Rc::ptr_eq(p, &entity)) {
            warn!("refusing to add the player as a regular entity");
            return false;
        }
        if self.position_of(&entity).is_some() {
            warn!("entity already in the collection");
            return false;
        }
        self.entities.push(entity);
        debug!(count = self.entities.len(), "entity added");
        true
    }

    /// Remove the first entry with the same identity. Missing is a no-op.
    pub fn remove_entity(&mut self, entity: &EntityRef) -> bool {
        match self.position_of(entity) {
            Some(index) => {
                self.entities.remove(index);
                debug!(count = self.entities.len(), "entity removed");
                true
            }
            None => false,
        }
    }

    fn position_of(&self, entity: &EntityRef) -> Option<usize> {
        self.entities.iter().position(|e| Rc::ptr_eq(e, entity))
    }

    /// Replace the player. A handle also present in the entity collection is
    /// taken out of it.
    pub fn set_player(&mut self, player: EntityRef) -> Option<EntityRef> {
        if self.remove_entity(&player) {
            debug!("player moved out of the entity collection");
        }
        debug!("player set");
        self.player.replace(player)
    }

    pub fn clear_player(&mut self) -> Option<EntityRef> {
        self.player.take()
    }

    pub fn player(&self) -> Option<&EntityRef> {
        self.player.as_ref()
    }

    pub fn set_universe(&mut self, universe: Box<dyn Universe>) {
        debug!("universe set");
        self.universe = Some(universe);
    }

    pub fn clear_universe(&mut self) -> Option<Box<dyn Universe>> {
        self.universe.take()
    }

    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    pub fn handle_key_down(&mut self, code: &str) {
        self.keys.press(code);
    }

    pub fn handle_key_up(&mut self, code: &str) {
        self.keys.release(code);
    }

    pub fn handle_focus_lost(&mut self) {
        self.keys.release_all();
    }

    pub fn handle_resize(&mut self, width: f64, height: f64) {
        self.surface.resize(width, height);
    }

    /// Dispatch `on_click` to the first clickable entity, in insertion
    /// order, containing the click. Returns whether one was hit.
    pub fn handle_click(&mut self, click: PointerClick) -> bool {
        let point = click.local_to(&self.surface.bounding_rect());
        let hit = self
            .entities
            .iter()
            .find(|e| {
                let e = e.borrow();
                e.is_clickable() && is_point_in_entity(point, &*e)
            })
            .cloned();
        match hit {
            Some(entity) => {
                trace!(x = point.x, y = point.y, "entity clicked");
                entity
                    .borrow_mut()
                    .on_click(&mut EventContext::new(&entity, &mut self.commands));
                self.apply_commands();
                true
            }
            None => false,
        }
    }

    /// Process an input event and update state
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(code) => self.handle_key_down(code),
            InputEvent::KeyUp(code) => self.handle_key_up(code),
            InputEvent::Click(click) => {
                self.handle_click(*click);
            }
            InputEvent::Resize { width, height } => self.handle_resize(*width, *height),
            InputEvent::FocusLost => self.handle_focus_lost(),
        }
    }
}
