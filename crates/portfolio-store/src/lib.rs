pub mod allocation;
pub mod import;
pub mod session;
pub mod store;
pub mod weights;

pub use allocation::*;
pub use import::*;
pub use session::*;
pub use store::*;
pub use weights::*;
