pub mod bias;
pub mod compose;
pub mod config;
pub mod duplicate;
pub mod error;
pub mod generator;
pub mod hot;
pub mod sampler;

pub use error::{EngineError, EngineResult};
