//! Keyboard, pointer and pad state, mapped to logical actions.
//!
//! The host feeds raw events as they arrive; the game calls
//! [`InputManager::begin_tick`] once at the start of every update, which
//! latches key state so press and release transitions are observed exactly
//! once per tick.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use winit::keyboard::KeyCode;

/// Wheel movement beyond this many units in one tick is clamped
pub const WHEEL_CLAMP: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    StrafeLeft,
    StrafeRight,
    Fire,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Left,
    Right,
}

#[derive(Debug, Default)]
pub struct InputManager {
    bindings: HashMap<KeyCode, Action>,
    /// Keys down right now, as reported by the host
    down: HashSet<KeyCode>,
    /// Snapshot of `down` at the previous latch
    previous: HashSet<KeyCode>,
    /// Snapshot of `down` at the latest latch
    current: HashSet<KeyCode>,
    pointer_delta: Vec2,
    wheel: f32,
    wheel_latched: f32,
    sticks: HashMap<Stick, Vec2>,
    triggers: HashMap<Trigger, f32>,
}

impl InputManager {
    /// Manager with no bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD movement, Space to fire, Escape to quit
    pub fn with_default_bindings() -> Self {
        let mut input = Self::new();
        input.bind(KeyCode::KeyW, Action::MoveForward);
        input.bind(KeyCode::KeyS, Action::MoveBackward);
        input.bind(KeyCode::KeyA, Action::StrafeLeft);
        input.bind(KeyCode::KeyD, Action::StrafeRight);
        input.bind(KeyCode::Space, Action::Fire);
        input.bind(KeyCode::Escape, Action::Exit);
        input
    }

    /// Bind `key` to `action`, replacing whatever it was bound to
    pub fn bind(&mut self, key: KeyCode, action: Action) {
        if let Some(old) = self.bindings.insert(key, action) {
            if old != action {
                log::debug!("Rebound {key:?}: {old:?} -> {action:?}");
            }
        }
    }

    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }

    pub fn binding(&self, key: KeyCode) -> Option<Action> {
        self.bindings.get(&key).copied()
    }

    pub fn key_event(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.down.insert(key);
        } else {
            self.down.remove(&key);
        }
    }

    /// Accumulate relative pointer motion since the last tick
    pub fn pointer_moved(&mut self, delta: Vec2) {
        self.pointer_delta += delta;
    }

    pub fn wheel_moved(&mut self, delta: f32) {
        self.wheel += delta;
    }

    pub fn set_stick(&mut self, stick: Stick, value: Vec2) {
        self.sticks.insert(stick, value.clamp(Vec2::NEG_ONE, Vec2::ONE));
    }

    pub fn set_trigger(&mut self, trigger: Trigger, value: f32) {
        self.triggers.insert(trigger, value.clamp(0.0, 1.0));
    }

    /// Latch this tick's key state and wheel movement
    pub fn begin_tick(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.down.clone());
        self.wheel_latched = self.wheel.clamp(-WHEEL_CLAMP, WHEEL_CLAMP) / WHEEL_CLAMP;
        self.wheel = 0.0;
    }

    fn keys_for(&self, action: Action) -> impl Iterator<Item = &KeyCode> {
        self.bindings
            .iter()
            .filter(move |(_, &bound)| bound == action)
            .map(|(key, _)| key)
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.keys_for(action).any(|key| self.current.contains(key))
    }

    /// True on the tick a bound key went down
    pub fn was_pressed(&self, action: Action) -> bool {
        self.keys_for(action)
            .any(|key| self.current.contains(key) && !self.previous.contains(key))
    }

    /// True on the tick a bound key came up
    pub fn was_released(&self, action: Action) -> bool {
        self.keys_for(action)
            .any(|key| !self.current.contains(key) && self.previous.contains(key))
    }

    /// Pointer motion accumulated since the last call
    pub fn take_pointer_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.pointer_delta)
    }

    /// Wheel movement of the latched tick, in [-1, 1]
    pub fn wheel(&self) -> f32 {
        self.wheel_latched
    }

    pub fn stick(&self, stick: Stick) -> Vec2 {
        self.sticks.get(&stick).copied().unwrap_or(Vec2::ZERO)
    }

    pub fn trigger(&self, trigger: Trigger) -> f32 {
        self.triggers.get(&trigger).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_is_seen_for_one_tick() {
        let mut input = InputManager::with_default_bindings();
        input.key_event(KeyCode::Space, true);

        input.begin_tick();
        assert!(input.was_pressed(Action::Fire));
        assert!(input.is_held(Action::Fire));

        input.begin_tick();
        assert!(!input.was_pressed(Action::Fire));
        assert!(input.is_held(Action::Fire));

        input.key_event(KeyCode::Space, false);
        input.begin_tick();
        assert!(input.was_released(Action::Fire));
        assert!(!input.is_held(Action::Fire));
    }

    #[test]
    fn test_tap_between_ticks_is_missed() {
        let mut input = InputManager::with_default_bindings();
        input.begin_tick();
        input.key_event(KeyCode::Space, true);
        input.key_event(KeyCode::Space, false);
        input.begin_tick();
        assert!(!input.was_pressed(Action::Fire));
    }

    #[test]
    fn test_rebind_and_unbind() {
        let mut input = InputManager::with_default_bindings();
        input.bind(KeyCode::Space, Action::Exit);
        assert_eq!(input.binding(KeyCode::Space), Some(Action::Exit));

        input.key_event(KeyCode::Space, true);
        input.begin_tick();
        assert!(input.was_pressed(Action::Exit));
        assert!(!input.is_held(Action::Fire));

        input.unbind(KeyCode::Space);
        assert!(!input.is_held(Action::Exit));
    }

    #[test]
    fn test_pointer_delta_is_consumed() {
        let mut input = InputManager::new();
        input.pointer_moved(Vec2::new(3.0, -1.0));
        input.pointer_moved(Vec2::new(2.0, 4.0));
        assert_eq!(input.take_pointer_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(input.take_pointer_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_wheel_is_clamped_fraction() {
        let mut input = InputManager::new();
        input.wheel_moved(150.0);
        input.wheel_moved(150.0);
        input.begin_tick();
        assert_eq!(input.wheel(), 1.0);

        input.wheel_moved(-50.0);
        input.begin_tick();
        assert_eq!(input.wheel(), -0.25);

        input.begin_tick();
        assert_eq!(input.wheel(), 0.0);
    }

    #[test]
    fn test_analog_values() {
        let mut input = InputManager::new();
        input.set_stick(Stick::Left, Vec2::new(0.5, 2.0));
        input.set_trigger(Trigger::Right, 0.75);
        assert_eq!(input.stick(Stick::Left), Vec2::new(0.5, 1.0));
        assert_eq!(input.stick(Stick::Right), Vec2::ZERO);
        assert_eq!(input.trigger(Trigger::Right), 0.75);
    }
}
