pub mod classify;
pub mod defaults;
pub mod error;
pub mod types;

pub use classify::*;
pub use defaults::*;
pub use error::*;
pub use types::*;
