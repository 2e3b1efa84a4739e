//! Account Identity Allocation
//!
//! Generates the human-shareable public id every account carries
//! (`RELAY-XXXX-XXXX`) and the 4-digit discriminator that disambiguates
//! duplicate usernames.
//!
//! Neither function enforces uniqueness on its own. The `users.public_id`
//! and `(username, discriminator)` unique constraints are the real
//! invariant enforcers; a constraint violation surfaces as
//! `AppError::DuplicateIdentity` and the Account Directory retries the
//! whole allocation.

use rand::Rng;

/// Prefix for all public account ids.
pub const PUBLIC_ID_PREFIX: &str = "RELAY";

/// Number of random draws before the discriminator allocator gives up
/// probing and returns its last candidate.
const DISCRIMINATOR_ATTEMPTS: usize = 10;

/// Generate a public account id of the form `RELAY-XXXX-XXXX`.
///
/// Each group is 4 uppercase hex characters from a CSPRNG (`rand::rng()`
/// is cryptographically secure). Collision probability per pair is ~1/2^32
/// and is treated as negligible here; the storage constraint catches the
/// remainder.
pub fn allocate_public_id() -> String {
    let mut rng = rand::rng();
    let a: u16 = rng.random();
    let b: u16 = rng.random();
    format!("{}-{:04X}-{:04X}", PUBLIC_ID_PREFIX, a, b)
}

/// Pick a 4-digit discriminator for `username`.
///
/// Draws up to 10 uniform candidates in `[0, 10000)` and returns the first
/// one `taken` reports as free. If every draw collides, the last candidate
/// is returned anyway — a documented best-effort fallback for heavily
/// reused usernames; the unique constraint rejects the insert and the
/// caller re-allocates.
pub fn allocate_discriminator<F>(username: &str, mut taken: F) -> String
where
    F: FnMut(&str, &str) -> bool,
{
    let mut rng = rand::rng();
    let mut candidate = String::new();

    for _ in 0..DISCRIMINATOR_ATTEMPTS {
        candidate = format!("{:04}", rng.random_range(0..10_000u16));
        if !taken(username, &candidate) {
            return candidate;
        }
    }

    candidate
}

/// Check that a string has the shape of a public id without hitting storage.
pub fn is_public_id(value: &str) -> bool {
    let mut parts = value.splitn(3, '-');
    let (Some(prefix), Some(a), Some(b)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    prefix == PUBLIC_ID_PREFIX
        && [a, b].iter().all(|group| {
            group.len() == 4 && group.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
        })
}
