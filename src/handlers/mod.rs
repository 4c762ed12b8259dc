// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth: /, /health, /login) → Protected (/cars, /owners; bearer token
// required once `security.require_auth` is on)
pub mod protected;
pub mod public;

pub use protected::*;
pub use public::*;
