pub mod app;
pub mod auth;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::store::{CommentRow, CommentStore};
pub use auth::session::SessionAddress;
pub use domain::vote::VoteKind;
pub use infra::config::Config;
pub use infra::solana::KarmaTokenClient;
