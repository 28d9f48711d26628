pub mod authenticator;
pub mod bundle;
pub mod credentials;
pub mod store;

pub use authenticator::Authenticator;
pub use bundle::SessionBundle;
pub use credentials::{LoginCredentials, LoginSource};
pub use store::SessionStore;
