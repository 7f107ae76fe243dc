#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// An operation requiring a signed-in user was invoked with none.
    #[error("no authenticated user")]
    NoAuthenticatedUser,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account already exists for {0}")]
    EmailAlreadyRegistered(String),

    #[error("no account exists for {0}")]
    AccountNotFound(String),

    #[error("email is already verified")]
    EmailAlreadyVerified,

    /// The provider call itself failed (network, quota, misconfiguration).
    #[error("identity provider error: {0}")]
    Provider(String),
}
