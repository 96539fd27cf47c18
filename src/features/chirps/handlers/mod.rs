pub mod chirp_handler;

pub use chirp_handler::{create_chirp, delete_chirp, list_chirps, update_chirp};
