pub mod config;
pub mod error;
pub mod keyboard;
pub mod matcher;
pub mod models;
pub mod store;

// Re-export common items for convenience
pub use config::{ensure_config_dir, get_config_dir, get_db_file_path};
pub use error::{Result, SubtextError};
pub use keyboard::{key_event_char, EnigoActuator, InjectionFlag, KeyActuator};
pub use matcher::{KeyInput, TriggerMatcher};
pub use models::{RuleEntry, RuleRecord};
pub use store::RuleStore;
