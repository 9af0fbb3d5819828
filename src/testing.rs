//! Instrumented collaborators for unit tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::DVec2;

use crate::controller::FrameScheduler;
use crate::error::{EngineError, EngineResult};
use crate::model::{Entity, EntityKind, EntityRef, EntityView, EventContext, KeyState, Universe};
use crate::view::{BoundingRect, Surface};

#[derive(Debug, Default)]
pub struct CallLog {
    pub updates: Vec<f64>,
    pub keyed_updates: usize,
    pub pressed_keys: Vec<String>,
    pub others_seen: Vec<usize>,
    pub renders: usize,
    pub collisions: usize,
    pub collided_with: Vec<EntityKind>,
    pub clicks: usize,
}

/// Entity that records every callback into a shared [`CallLog`].
pub struct ScriptedEntity {
    pos: DVec2,
    radius: f64,
    velocity: DVec2,
    kind: EntityKind,
    clickable: bool,
    color: String,
    spawn: Option<EntityRef>,
    despawn_self: bool,
    despawn_on_hit: bool,
    despawn_on_click: bool,
    log: Rc<RefCell<CallLog>>,
}

impl ScriptedEntity {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            radius,
            velocity: DVec2::ZERO,
            kind: EntityKind::Other,
            clickable: false,
            color: "#fff".to_string(),
            spawn: None,
            despawn_self: false,
            despawn_on_hit: false,
            despawn_on_click: false,
            log: Rc::new(RefCell::new(CallLog::default())),
        }
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = DVec2::new(vx, vy);
        self
    }

    /// Spawn `entity` during the first update.
    pub fn spawning(mut self, entity: EntityRef) -> Self {
        self.spawn = Some(entity);
        self
    }

    /// Queue its own removal on every update.
    pub fn despawning(mut self) -> Self {
        self.despawn_self = true;
        self
    }

    /// Queue its own removal from every collision.
    pub fn despawning_on_hit(mut self) -> Self {
        self.despawn_on_hit = true;
        self
    }

    /// Queue its own removal when clicked.
    pub fn despawning_on_click(mut self) -> Self {
        self.despawn_on_click = true;
        self
    }

    pub fn log(&self) -> Rc<RefCell<CallLog>> {
        self.log.clone()
    }
}

impl Entity for ScriptedEntity {
    fn update(&mut self, delta: f64, keys: Option<&KeyState>, world: &mut EntityView<'_>) {
        let mut log = self.log.borrow_mut();
        log.updates.push(delta);
        if let Some(keys) = keys {
            log.keyed_updates += 1;
            let mut pressed: Vec<String> = keys.pressed().map(str::to_string).collect();
            pressed.sort();
            log.pressed_keys = pressed;
        }
        // borrowing every other entity must be safe mid-update
        let seen = world.others().map(|other| other.borrow().position()).count();
        log.others_seen.push(seen);

        self.pos += self.velocity * delta;

        if let Some(spawned) = self.spawn.take() {
            world.spawn(spawned);
        }
        if self.despawn_self {
            world.despawn_self();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.log.borrow_mut().renders += 1;
        surface.fill_circle(self.pos.x, self.pos.y, self.radius, &self.color);
    }

    fn position(&self) -> DVec2 {
        self.pos
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn kind(&self) -> EntityKind {
        self.kind
    }

    fn on_collision(&mut self, other: &dyn Entity, events: &mut EventContext<'_>) {
        let mut log = self.log.borrow_mut();
        log.collisions += 1;
        log.collided_with.push(other.kind());
        if self.despawn_on_hit {
            events.despawn_self();
        }
    }

    fn is_clickable(&self) -> bool {
        self.clickable
    }

    fn on_click(&mut self, events: &mut EventContext<'_>) {
        self.log.borrow_mut().clicks += 1;
        if self.despawn_on_click {
            events.despawn_self();
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    ClearRect(f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64, String),
    FillCircle(f64, f64, f64, String),
    StrokeCircle(f64, f64, f64, String),
    FillText(String),
}

/// Surface that records draw calls into a shared list.
pub struct RecordingSurface {
    width: f64,
    height: f64,
    rect: BoundingRect,
    calls: Rc<RefCell<Vec<DrawCall>>>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            rect: BoundingRect::new(0.0, 0.0, width, height),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Place the surface at `(left, top)` in client space.
    pub fn at(mut self, left: f64, top: f64) -> Self {
        self.rect = BoundingRect::new(left, top, self.width, self.height);
        self
    }

    pub fn calls(&self) -> Rc<RefCell<Vec<DrawCall>>> {
        self.calls.clone()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.rect.width = width;
        self.rect.height = height;
    }

    fn bounding_rect(&self) -> BoundingRect {
        self.rect
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.calls.borrow_mut().push(DrawCall::ClearRect(x, y, w, h));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.calls.borrow_mut().push(DrawCall::FillRect(x, y, w, h, color.to_string()));
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: &str) {
        self.calls.borrow_mut().push(DrawCall::FillCircle(x, y, radius, color.to_string()));
    }

    fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, _line_width: f64) {
        self.calls.borrow_mut().push(DrawCall::StrokeCircle(x, y, radius, color.to_string()));
    }

    fn fill_text(&mut self, text: &str, _x: f64, _y: f64, _size: f64, _color: &str) {
        self.calls.borrow_mut().push(DrawCall::FillText(text.to_string()));
    }
}

/// Scheduler that only counts requests. The test drives `tick` itself.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    requests: Rc<Cell<usize>>,
    failing: Rc<Cell<bool>>,
}

impl ManualScheduler {
    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn fail_next(&self, fail: bool) {
        self.failing.set(fail);
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> EngineResult<()> {
        if self.failing.get() {
            return Err(EngineError::Schedule("host refused frame".to_string()));
        }
        self.requests.set(self.requests.get() + 1);
        Ok(())
    }
}

/// Universe that writes a marker and remembers the player position it got.
#[derive(Default)]
pub struct TaggedUniverse {
    pub seen_players: Rc<RefCell<Vec<Option<DVec2>>>>,
}

impl Universe for TaggedUniverse {
    fn render_background(&mut self, surface: &mut dyn Surface, player: Option<&dyn Entity>) {
        self.seen_players.borrow_mut().push(player.map(|p| p.position()));
        surface.fill_text("universe", 0.0, 0.0, 12.0, "#fff");
    }
}
