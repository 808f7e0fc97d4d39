mod detail;
mod index;

pub use detail::*;
pub use index::*;
