//! Garage feature: the cars a user tracks mod progress on.
//!
//! Ownership is a plain `user_id`; there is no authentication layer.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/cars?user_id=` | List a user's cars |
//! | POST | `/api/cars` | Add car |
//! | GET | `/api/cars/{car_id}` | Get car |
//! | PATCH | `/api/cars/{car_id}` | Update car |
//! | DELETE | `/api/cars/{car_id}` | Delete car and its mod progress |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::CarService;
