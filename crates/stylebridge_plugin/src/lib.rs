pub mod config_loader;
pub mod css_modules;
pub mod dependency_collector;
pub mod path_resolver;
pub mod preprocessor;
pub mod stylesheet_plugin;
pub mod temp_output;
pub mod tracing_setup;
pub mod transform_chain;
mod virtual_module;

pub use config_loader::load_options;
pub use stylesheet_plugin::StylesheetPlugin;
pub use stylesheet_plugin::StylesheetPluginInit;
pub use tracing_setup::setup_tracing;
