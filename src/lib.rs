pub mod api;
pub mod config;
pub mod error;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod searches;

pub use config::Config;
pub use error::{AppError, Result};
pub use output::RunOutput;
