mod identity;
mod manager;
mod manager_middleware;
pub mod session;

pub use identity::*;
pub use manager::*;
pub use manager_middleware::*;
