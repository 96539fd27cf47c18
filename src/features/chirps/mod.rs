//! Chirps feature - short user-authored posts with an optional image.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/chirps` | Yes | List chirps, newest first |
//! | POST | `/api/chirps` | Yes | Create a chirp (multipart) |
//! | PUT/PATCH | `/api/chirps/{id}` | Owner | Update a chirp (multipart) |
//! | DELETE | `/api/chirps/{id}` | Owner | Delete a chirp and its image |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ChirpService;
