use crate::error::{Result, SubtextError};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Seam between the matcher and key synthesis. The production implementation
/// drives enigo; tests substitute a recording mock.
pub trait KeyActuator {
    /// Send `count` discrete backspace keystrokes, one key event each.
    fn backspace(&mut self, count: usize) -> Result<()>;

    /// Type `text` verbatim into the foreground application, including
    /// embedded line breaks.
    fn type_text(&mut self, text: &str) -> Result<()>;
}

/// Process-wide flag raised while synthetic key events are being injected.
/// The listener drops every event it observes while the flag is up, so the
/// matcher never consumes its own backspaces or replacement text.
#[derive(Clone, Default)]
pub struct InjectionFlag(Arc<AtomicBool>);

impl InjectionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn raise(&self) -> InjectionGuard {
        self.0.store(true, Ordering::SeqCst);
        InjectionGuard {
            flag: Arc::clone(&self.0),
        }
    }
}

/// Lowers the injection flag when dropped, including on the error path.
struct InjectionGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InjectionGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Extract the literal character a key event produced, if any. rdev reports
/// the resolved character (shift state applied) in the event name; anything
/// longer than one char or a control character is not a printable key.
pub fn key_event_char(event: &rdev::Event) -> Option<char> {
    let name = event.name.as_deref()?;
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}

/// Keyboard actuation backed by enigo. The controller is created lazily on
/// the first actuation so that constructing the actuator never touches the OS.
pub struct EnigoActuator {
    enigo: Option<Enigo>,
    flag: InjectionFlag,
}

impl EnigoActuator {
    pub fn new(flag: InjectionFlag) -> Self {
        Self { enigo: None, flag }
    }

    fn controller(&mut self) -> Result<&mut Enigo> {
        if self.enigo.is_none() {
            let settings = Settings::default();
            let enigo = Enigo::new(&settings).map_err(|err| {
                SubtextError::Enigo(format!("Failed to create keyboard controller: {}", err))
            })?;
            self.enigo = Some(enigo);
        }
        Ok(self.enigo.as_mut().unwrap())
    }
}

// Splitting long lines keeps the synthetic key stream from overwhelming the
// platform's input queue.
const CHUNK_SIZE: usize = 512;

impl KeyActuator for EnigoActuator {
    fn backspace(&mut self, count: usize) -> Result<()> {
        let _guard = self.flag.raise();
        let keyboard = self.controller()?;
        for _ in 0..count {
            thread::sleep(Duration::from_millis(2));
            keyboard
                .key(Key::Backspace, Direction::Click)
                .map_err(|err| {
                    SubtextError::Enigo(format!("Failed to send backspace: {}", err))
                })?;
        }
        Ok(())
    }

    fn type_text(&mut self, text: &str) -> Result<()> {
        let _guard = self.flag.raise();
        let keyboard = self.controller()?;

        // Let the deleted characters settle before retyping.
        thread::sleep(Duration::from_millis(10));

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                keyboard
                    .key(Key::Return, Direction::Click)
                    .map_err(|err| {
                        SubtextError::Enigo(format!("Failed to type newline: {}", err))
                    })?;
                thread::sleep(Duration::from_millis(15));
            }

            let chars: Vec<char> = line.chars().collect();
            for chunk in chars.chunks(CHUNK_SIZE) {
                let chunk_str: String = chunk.iter().collect();
                if chunk_str.is_empty() {
                    continue;
                }
                keyboard.text(&chunk_str).map_err(|err| {
                    SubtextError::Enigo(format!("Failed to type text: {}", err))
                })?;
                thread::sleep(Duration::from_millis(10));
            }
        }

        Ok(())
    }
}
