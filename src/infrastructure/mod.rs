//! Infrastructure layer - external adapters (database, filesystem, terminal).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod local_storage;
pub mod notifier;
pub mod streams;

pub use config::{ensure_config_exists, load_config, save_config};
pub use local_storage::LocalStorage;
pub use notifier::ConsoleNotifier;
pub use streams::{FileSink, FileSource};
