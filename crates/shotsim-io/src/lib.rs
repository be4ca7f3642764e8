//! File I/O, validation, and serialization for shotsim.

mod config_reader;
mod domain;
mod error;
mod reader;
mod writer;

pub use config_reader::ConfigReader;
pub use domain::ComparisonName;
pub use error::IoError;
pub use reader::MotionReader;
pub use writer::ResultWriter;
