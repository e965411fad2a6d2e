pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::GlimpseConfig;
pub use error::{GlimpseError, Result};
pub use events::SessionEvent;
pub use types::*;
