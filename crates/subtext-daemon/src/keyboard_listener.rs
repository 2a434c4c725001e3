use rdev::{EventType, Key as RdevKey};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use subtext_core::{
    key_event_char, EnigoActuator, InjectionFlag, KeyInput, RuleStore, TriggerMatcher,
};

/// Map a raw OS event to the matcher's input alphabet. Events that are not
/// key presses (releases, pointer moves) are dropped here, except mouse
/// clicks, which reposition the caret and therefore count as navigation.
fn classify(event: &rdev::Event) -> Option<KeyInput> {
    match event.event_type {
        EventType::KeyPress(key) => Some(classify_key(key, event)),
        EventType::ButtonPress(_) => Some(KeyInput::Navigation),
        _ => None,
    }
}

fn classify_key(key: RdevKey, event: &rdev::Event) -> KeyInput {
    match key {
        RdevKey::Space | RdevKey::Return => KeyInput::Boundary,
        RdevKey::Backspace => KeyInput::Backspace,
        RdevKey::LeftArrow
        | RdevKey::RightArrow
        | RdevKey::UpArrow
        | RdevKey::DownArrow
        | RdevKey::Home
        | RdevKey::End
        | RdevKey::PageUp
        | RdevKey::PageDown
        | RdevKey::Delete => KeyInput::Navigation,
        _ => match key_event_char(event) {
            Some(c) => KeyInput::Char(c),
            None => KeyInput::Other,
        },
    }
}

/// Start the keyboard listener thread: every key event is classified and fed
/// to the trigger matcher, which may fire a replacement against the shared
/// rule store.
///
/// Events observed while the injection flag is raised are the actuator's own
/// synthetic keystrokes and are dropped before they reach the matcher. An
/// error while handling a single event is logged and the listener moves on.
pub fn start_keyboard_listener(
    store: Arc<Mutex<RuleStore>>,
    running: Arc<Mutex<bool>>,
    injection: InjectionFlag,
) -> JoinHandle<()> {
    let running_clone = Arc::clone(&running);

    thread::spawn(move || {
        let matcher = Arc::new(Mutex::new(TriggerMatcher::new()));

        let callback = {
            let running = Arc::clone(&running_clone);
            let injection = injection.clone();
            move |event: rdev::Event| {
                if !*running.lock().unwrap() {
                    return;
                }
                if injection.is_raised() {
                    return;
                }

                let input = match classify(&event) {
                    Some(input) => input,
                    None => return,
                };

                let mut matcher = matcher.lock().unwrap();
                let mut actuator = EnigoActuator::new(injection.clone());
                if let Err(e) = matcher.handle_key(input, &store, &mut actuator) {
                    eprintln!("Error handling key event: {}", e);
                }
            }
        };

        // Start a retry loop for the keyboard listener
        let mut retry_count = 0;
        let max_retries = 5;

        while *running_clone.lock().unwrap() && retry_count < max_retries {
            match rdev::listen(callback.clone()) {
                Ok(_) => {
                    // listen() blocks for the process lifetime; returning at
                    // all means the hook was torn down.
                    break;
                }
                Err(e) => {
                    eprintln!("Error in keyboard listener: {:?}", e);
                    retry_count += 1;
                    eprintln!(
                        "Retrying keyboard listener ({}/{})...",
                        retry_count, max_retries
                    );
                    thread::sleep(Duration::from_secs(1));
                }
            }
        }

        if retry_count >= max_retries {
            eprintln!(
                "Failed to start keyboard listener after {} attempts",
                max_retries
            );
        }
    })
}
