mod app_context;
mod config_warnings;

pub use app_context::{AppContext, load_config};
pub use config_warnings::warn_unconfigured;
