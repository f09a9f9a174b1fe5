//! Text-to-speech stub.
//!
//! No synthesis backend is wired up; voice requests are accepted and the
//! digest simply ships without audio.

/// Synthesize speech for a summary, returning a URL to the audio.
///
/// Always `None` for now.
#[must_use]
pub fn synthesize(_summary: &str) -> Option<String> {
    None
}
