//! Database repositories

pub mod product;
pub mod session;
pub mod user;

pub use product::ProductRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
