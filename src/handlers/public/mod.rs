// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus liveness endpoints. Never wrapped by the JWT middleware.

pub mod login;
pub mod system;

pub use login::login_post;
pub use system::{health, root};
