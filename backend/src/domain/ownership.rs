//! Owned-resource capability shared by listings and rentals.
//!
//! Repositories scope every lookup and mutation by `(id, owner)` in a single
//! predicate. Services additionally run [`check_ownership`] on every record a
//! repository hands back, so an adapter bug can never leak another user's
//! record.

use crate::domain::UserId;

/// A record exclusively controlled by one user.
pub trait OwnedResource {
    /// The user allowed to mutate or delete the record.
    fn owner(&self) -> &UserId;
}

/// Returns `true` when `caller` owns `resource`.
///
/// # Examples
/// ```
/// use rentease::domain::{OwnedResource, UserId, check_ownership};
///
/// struct Note(UserId);
/// impl OwnedResource for Note {
///     fn owner(&self) -> &UserId {
///         &self.0
///     }
/// }
///
/// let alice = UserId::random();
/// let bob = UserId::random();
/// let note = Note(alice);
/// assert!(check_ownership(&alice, &note));
/// assert!(!check_ownership(&bob, &note));
/// ```
pub fn check_ownership<R>(caller: &UserId, resource: &R) -> bool
where
    R: OwnedResource + ?Sized,
{
    resource.owner() == caller
}
