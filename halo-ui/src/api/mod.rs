//! HTTP API handlers for halo-ui

pub mod bible;
pub mod chapter;
pub mod health;
pub mod plan;
pub mod progress;
pub mod settings;
pub mod speech;

pub use bible::get_passage;
pub use chapter::{close_chapter, get_chapter, open_chapter};
pub use health::health_routes;
pub use plan::{complete_plan, get_plan};
pub use progress::{get_progress, toggle_chapter};
pub use settings::{get_settings, update_settings};
pub use speech::speech_control;
