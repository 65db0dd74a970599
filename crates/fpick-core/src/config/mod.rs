//! Configuration management for fpick.
//!
//! Cache limits, fetch budgets and the search debounce window are stored
//! as a TOML file ([`settings::Config`]) and loaded at startup.

pub mod settings;

pub use settings::{CacheConfig, Config, DirectoryConfig, SearchConfig};
