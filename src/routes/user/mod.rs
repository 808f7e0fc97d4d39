mod account;
mod login;
mod logout;
mod register;

pub use account::*;
pub use login::*;
pub use logout::*;
pub use register::*;
