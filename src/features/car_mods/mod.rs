//! Per-car mod progress.
//!
//! The ledger records which mods a car has started or completed. Unlock
//! status is never stored: every read joins the catalog with the car's
//! ledger through [`resolver::resolve_statuses`], and tree views nest the
//! result by parent.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/cars/{car_id}/mods` | Ledger entries |
//! | GET | `/api/cars/{car_id}/mods/status` | Every mod with status |
//! | GET | `/api/cars/{car_id}/mods/tree` | Status tree (`roots_only`) |
//! | GET | `/api/cars/{car_id}/mods/{mod_id}` | One entry |
//! | PATCH | `/api/cars/{car_id}/mods/{mod_id}` | Edit entry |
//! | DELETE | `/api/cars/{car_id}/mods/{mod_id}` | Delete entry |
//! | POST | `/api/cars/{car_id}/mods/{mod_id}/complete` | Mark completed |
//! | POST | `/api/cars/{car_id}/mods/{mod_id}/incomplete` | Clear completion |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod resolver;
pub mod routes;
pub mod services;

pub use services::CarModService;
