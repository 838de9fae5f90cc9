pub mod router;
pub mod types;
pub mod handlers {
    pub mod comments;
    pub mod health;
    pub mod profiles;
    pub mod session;
    pub mod tokens;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
