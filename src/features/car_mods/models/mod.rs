pub mod car_mod;
pub mod mod_status;

pub use car_mod::CarModEntry;
pub use mod_status::{ModStatus, ModStatusTree};
