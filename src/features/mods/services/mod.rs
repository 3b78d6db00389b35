pub mod mod_service;

pub use mod_service::ModService;
