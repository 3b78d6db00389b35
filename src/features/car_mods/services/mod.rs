pub mod car_mod_service;

pub use car_mod_service::CarModService;
