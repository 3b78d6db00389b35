pub mod car_handler;

pub use car_handler::*;
