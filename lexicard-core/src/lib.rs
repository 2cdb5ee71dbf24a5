pub mod errors;
pub mod filters;
pub mod migrate;
pub mod models;
pub mod repo;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod transfer;

pub use errors::*;
pub use filters::*;
pub use migrate::{Snapshot, CURRENT_VERSION};
pub use models::*;
pub use repo::*;
pub use scheduler::*;
pub use session::*;
pub use stats::*;
