pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use traits::{DocumentAnalyzer, PreviewStore};
pub use types::*;
