use crate::error::Result;
use crate::keyboard::KeyActuator;
use crate::store::RuleStore;
use std::sync::Mutex;

/// A key event as the matcher sees it. The listener classifies raw OS events
/// into this shape; everything the matcher does is a single exhaustive match
/// over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character was typed.
    Char(char),
    /// Space or enter: the word is finished, check it against the rules.
    Boundary,
    /// Trailing-edit backspace.
    Backspace,
    /// A key (or click) that can move the caret. The buffer has no caret
    /// model, so the only safe response is to start over.
    Navigation,
    /// Modifiers, function keys, anything else: explicitly no effect.
    Other,
}

/// The incremental trigger matcher. Its entire state is the word typed since
/// the last boundary, backspace-to-empty, or caret movement; matching happens
/// only when a boundary key arrives, against the whole buffer, never a
/// substring of it.
#[derive(Default)]
pub struct TriggerMatcher {
    buffer: String,
}

impl TriggerMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of the typed-word buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Consume one key event. Returns the trigger that fired, if any.
    ///
    /// On a fire the store is updated (and persisted) before any key is
    /// synthesized; the backspace count covers the trigger plus the boundary
    /// key, which the foreground application has already received.
    pub fn handle_key(
        &mut self,
        input: KeyInput,
        store: &Mutex<RuleStore>,
        actuator: &mut dyn KeyActuator,
    ) -> Result<Option<String>> {
        match input {
            KeyInput::Char(c) => {
                self.buffer.push(c);
                Ok(None)
            }
            KeyInput::Boundary => self.on_boundary(store, actuator),
            KeyInput::Backspace => {
                self.buffer.pop();
                Ok(None)
            }
            KeyInput::Navigation => {
                self.buffer.clear();
                Ok(None)
            }
            KeyInput::Other => Ok(None),
        }
    }

    fn on_boundary(
        &mut self,
        store: &Mutex<RuleStore>,
        actuator: &mut dyn KeyActuator,
    ) -> Result<Option<String>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let matched = {
            let mut store = store.lock().unwrap();
            match store.find(&self.buffer) {
                Some(entry) => {
                    let trigger = entry.trigger.clone();
                    let text = entry.text.clone();
                    store.record_use(&trigger)?;
                    Some((trigger, text))
                }
                None => None,
            }
        };

        let (trigger, text) = match matched {
            Some(hit) => hit,
            None => {
                self.buffer.clear();
                return Ok(None);
            }
        };

        // Erase the trigger and the boundary key itself, then retype.
        actuator.backspace(trigger.chars().count() + 1)?;
        actuator.type_text(&text)?;
        self.buffer.clear();

        Ok(Some(trigger))
    }
}
