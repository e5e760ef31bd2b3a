//! Authentication: credential login, JWT, session and provider sign-in.

mod handlers;
mod jwt;
mod password;
mod provider;
mod redirect;
mod state;
mod verifier;

pub use handlers::{
    login, provider_sign_in, register, session, sign_out, LoginRequest, LoginResponse,
    RegisterRequest, RegisterResponse,
};
pub use jwt::{Claims, JwtSecret, TOKEN_TTL_SECS};
pub use password::PasswordService;
pub use provider::{OAuthProvider, ProviderRegistry};
pub use redirect::{CallbackQuery, CallbackUrl};
pub use state::StateSigner;
pub use verifier::CredentialVerifier;
