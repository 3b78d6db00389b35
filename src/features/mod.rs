pub mod car_mods;
pub mod cars;
pub mod mods;
