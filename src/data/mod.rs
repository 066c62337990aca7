//! In-process event model: reconstructed tracks, identified and true particles, tagger hits

mod event;
pub use event::{Event, Particle, TaggerHit, Track, Trigger};
