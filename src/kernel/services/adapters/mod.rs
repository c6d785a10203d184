//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod paths;
pub mod resource;
pub mod runtime;
pub mod search;
pub mod settings;

pub use paths::{ensure_log_dir, get_log_dir};
pub use resource::{LocalResourceTree, MemoryResourceTree};
pub use runtime::{build_runtime, Debouncer};
pub use search::{ChannelSink, EngineState, QueryModel, SearchEngine};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, SettingsError,
};
