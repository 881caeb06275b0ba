//! Session seam.
//!
//! The engine does not manage logins. Whoever owns the session tells it which
//! user is signed in, if any.

use uuid::Uuid;

pub trait SessionProvider {
    fn current_user_id(&self) -> Option<Uuid>;
}

impl SessionProvider for Option<Uuid> {
    fn current_user_id(&self) -> Option<Uuid> {
        *self
    }
}

impl SessionProvider for Uuid {
    fn current_user_id(&self) -> Option<Uuid> {
        Some(*self)
    }
}
