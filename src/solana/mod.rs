pub mod client;
pub mod reporter;
pub mod tokens;
