//! Mod catalog feature.
//!
//! The catalog is a forest: each mod may name a parent that has to be
//! completed on a car before the mod unlocks. Writes here keep that parent
//! graph acyclic and free of dangling references.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/mods` | List mods (`category`, `roots_only`, `tree`) |
//! | POST | `/api/mods` | Create mod |
//! | GET | `/api/mods/{id}` | Get mod |
//! | PATCH | `/api/mods/{id}` | Update mod |
//! | DELETE | `/api/mods/{id}` | Delete mod without children |
//! | GET | `/api/mods/{id}/children` | Direct children |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::ModService;
