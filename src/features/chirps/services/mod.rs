mod chirp_service;

pub use chirp_service::{owner_only, ChirpService, ModifyPolicy};
