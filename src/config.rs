//! Configuration file parsing and validation

pub mod style_toml;

pub use style_toml::{
    CONFIG_FILE, ColorOption, Config, DEFAULT_CONFIG, OutputConfig, OutputFormat, StyleMeta,
};
