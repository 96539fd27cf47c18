mod chirp;

pub use chirp::{Chirp, ChirpWithAuthor};
