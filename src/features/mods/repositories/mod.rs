pub mod mod_repository;

pub use mod_repository::{ModRepository, PgModRepository};
