//! Token service and account lockout.
//!
//! Access tokens are verified statelessly. Refresh tokens are additionally
//! matched against the single slot on the user record, which rotation and
//! revocation overwrite.

pub mod lockout;
pub mod profile_sync;
pub mod service;
pub mod session;
pub mod tokens;

pub use lockout::LockoutPolicy;
pub use profile_sync::{HttpProfileSync, NoopProfileSync, ProfileSync};
pub use service::AuthService;
pub use session::{ClientSession, TokenRefresher};
pub use tokens::{Claims, Identity, TokenConfig, TokenKind, TokenPair, TokenSigner};
