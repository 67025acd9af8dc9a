//! HTTP Handlers

mod audio;
mod ping;
mod session;
mod synthesis;
mod voice;

pub use audio::*;
pub use ping::*;
pub use session::*;
pub use synthesis::*;
pub use voice::*;
