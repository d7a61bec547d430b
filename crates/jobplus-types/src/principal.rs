//! Login capability for records that can act as an authenticated principal.

/// A record that a session layer can log in.
///
/// The defaults describe a persisted, enabled account. Implementors only
/// supply [`Principal::principal_id`], the value a session cookie stores.
pub trait Principal {
    /// Stable identifier stored in the session.
    fn principal_id(&self) -> String;

    fn is_authenticated(&self) -> bool {
        true
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_anonymous(&self) -> bool {
        false
    }
}
