mod directory;
mod router;
mod ws_handler;

pub use directory::*;
pub use router::*;
pub use ws_handler::*;
