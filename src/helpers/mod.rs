pub mod flash;
pub mod password;
pub mod redirect;
