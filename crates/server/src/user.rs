//! The authenticated caller.

/// Id of the user a request was authenticated as.
///
/// Inserted by the auth middleware; every handler scopes its queries to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser(pub String);

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}
