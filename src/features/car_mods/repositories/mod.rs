pub mod car_mod_repository;

pub use car_mod_repository::{CarModRepository, PgCarModRepository};
