pub mod item;
pub mod review;
mod templates;
pub mod user;

pub use templates::*;

pub(crate) const DATE_FORMAT: &str = "%B %d, %Y at %H:%M:%S";
