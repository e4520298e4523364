//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard codes, touches) to impulses
//! - Wall-clock seeds

use crate::sim::InputAction;

/// Raw input as delivered by the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// `KeyboardEvent.code`
    Key(String),
    TouchStart,
}

/// Map a raw event to an impulse, if it is one
pub fn map_input(input: &RawInput) -> Option<InputAction> {
    match input {
        RawInput::Key(code) => action_for_key(code),
        RawInput::TouchStart => Some(InputAction::Lift),
    }
}

pub fn action_for_key(code: &str) -> Option<InputAction> {
    match code {
        "ArrowUp" => Some(InputAction::Lift),
        "ArrowDown" => Some(InputAction::DownForce),
        _ => None,
    }
}

/// Seed for a new session from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn time_seed() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
