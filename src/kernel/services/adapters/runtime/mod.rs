mod async_runtime;
mod debounce;

pub use async_runtime::build_runtime;
pub use debounce::Debouncer;
