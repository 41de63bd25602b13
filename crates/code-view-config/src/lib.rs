pub mod config;

pub use config::{ViewerConfig, OUTPUT_FORMATS};
