mod item;
mod review;
pub mod user;

pub use item::*;
pub use review::*;
pub use user::*;
