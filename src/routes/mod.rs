pub mod health_checks;
pub mod item;
pub mod user;

pub use health_checks::*;
