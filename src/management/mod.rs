mod credentials;
mod token;

pub use credentials::CredentialStore;
pub use token::AuthorizationHandle;
pub use token::TokenManager;
