pub mod mod_handler;

pub use mod_handler::*;
