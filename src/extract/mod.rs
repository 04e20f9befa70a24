//! Extraction of structured records from catalogue markup
//!
//! Two concerns live here:
//! - `listing`: song-id discovery from artist listing pages
//! - `song`: title and lyrics-body resolution from a song page via an
//!   ordered chain of container heuristics

mod listing;
mod song;

pub use listing::extract_song_ids;
pub use song::{extract_song, ExtractedSong};
