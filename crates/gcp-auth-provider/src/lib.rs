//! Credential resolution and bearer token caching shared by every Google API client in this
//! workspace.
//!
//! A [`Credential`] names where key material lives, a [`TokenProvider`] turns it into access
//! tokens, and [`Auth`] caches the resulting `Authorization` header until the token expires.
use std::sync::Arc;

mod auth;
mod authorized_user;
mod credential;
#[cfg(feature = "emulator")]
mod emulator;
mod error;
mod scope;
mod service_account;

pub use auth::Auth;
pub use authorized_user::AuthorizedUser;
pub use credential::Credential;
pub use error::Error;
/// Re-export so consumers can name the token type without depending on [`gcp_auth`] directly.
pub use gcp_auth::Token;
pub use scope::Scope;
pub use service_account::ServiceAccount;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum TokenProvider {
    ServiceAccount(ServiceAccount),
    AuthorizedUser(AuthorizedUser),
    #[cfg(feature = "emulator")]
    Emulator(emulator::EmulatorProvider),
}

impl TokenProvider {
    /// Loads the key material a [`Credential`] points at. Nothing is requested from Google yet.
    pub async fn load(credential: &Credential) -> Result<Self> {
        match credential {
            Credential::ServiceAccount { path } => {
                ServiceAccount::from_file(path).map(Self::ServiceAccount)
            }
            Credential::AuthorizedUser { token_path } => AuthorizedUser::from_file(token_path)
                .await
                .map(Self::AuthorizedUser),
            #[cfg(feature = "emulator")]
            Credential::Emulator { token } => {
                emulator::EmulatorProvider::new(token).map(Self::Emulator)
            }
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ServiceAccount(_) => ServiceAccount::NAME,
            Self::AuthorizedUser(_) => AuthorizedUser::NAME,
            #[cfg(feature = "emulator")]
            Self::Emulator(_) => emulator::EmulatorProvider::NAME,
        }
    }

    pub async fn get_token(&self, scopes: &[Scope]) -> Result<Arc<Token>> {
        match self {
            Self::ServiceAccount(acct) => acct.get_token(scopes).await,
            Self::AuthorizedUser(user) => user.get_token(scopes).await,
            #[cfg(feature = "emulator")]
            Self::Emulator(emulator) => Ok(emulator.get_token()),
        }
    }
}
