use std::collections::HashMap;

/// Key code → currently pressed. Codes stay pressed until released.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    keys: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        self.keys.insert(code.to_string(), true);
    }

    pub fn release(&mut self, code: &str) {
        self.keys.insert(code.to_string(), false);
    }

    /// Release every key (focus loss).
    pub fn release_all(&mut self) {
        for pressed in self.keys.values_mut() {
            *pressed = false;
        }
    }

    pub fn is_pressed(&self, code: &str) -> bool {
        self.keys.get(code).copied().unwrap_or(false)
    }

    /// `None` for a code that has never been seen.
    pub fn get(&self, code: &str) -> Option<bool> {
        self.keys.get(code).copied()
    }

    pub fn pressed(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|(_, pressed)| **pressed)
            .map(|(code, _)| code.as_str())
    }
}
