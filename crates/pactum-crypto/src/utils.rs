//! Constant-time comparison of key material.

use constant_time_eq::constant_time_eq;

/// Compare two byte slices in constant time.
///
/// Used when checking a stored counterparty key against an incoming one, so
/// that the comparison does not leak how many leading bytes matched.
///
/// ```rust
/// use pactum_crypto::utils::constant_time_compare;
///
/// assert!(constant_time_compare(&[0u8; 32], &[0u8; 32]));
/// assert!(!constant_time_compare(&[0u8; 32], &[1u8; 32]));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    constant_time_eq(a, b)
}
