pub mod car_mod_handler;

pub use car_mod_handler::*;
