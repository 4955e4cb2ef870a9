pub mod audio;
pub mod cli;
pub mod clock;
pub mod config;
pub mod dial;
pub mod event_loop;
pub mod input;
pub mod logging;
pub mod mode;
pub mod picker;
pub mod scheduler;
pub mod session;
pub mod tempo;
pub mod ui;

pub use cli::Args;
pub use config::{Settings, SettingsError};
pub use session::Session;
