pub mod account;

pub use account::{dispatch, Outcome};
