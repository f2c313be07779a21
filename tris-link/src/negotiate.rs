//! Symmetric role arbitration for two identical peers
//!
//! Neither endpoint has authority over the other, so first move is decided
//! by a one-round token exchange: each side draws a random token, sends it,
//! and both apply the same comparison to the (local, remote) pair.

use crate::types::Symbol;

/// Number of buckets the handshake token is drawn from
///
/// Two uniform draws collide with probability 1/10_000 per session; the
/// session layer treats a colliding token as an echo and keeps waiting (see
/// `GameSession::ingest`).
pub const TOKEN_SPACE: u32 = 10_000;

/// Draw the local handshake token, uniform in `[0, TOKEN_SPACE)`
///
/// Called once per session, before any role is known.
pub fn draw_token() -> u32 {
    rand::random_range(0..TOKEN_SPACE)
}

/// Resolve the local role from the two handshake tokens
///
/// Pure. Both peers run the identical comparison with their arguments
/// swapped, so any pair of distinct tokens yields exactly one `First` and
/// one `Second`. Equal tokens map to `First` on both ends; deterministic,
/// but never reached in practice because the session drops an inbound token
/// equal to its own as an echo.
pub fn resolve_role(local_token: u32, remote_token: u32) -> Symbol {
    if local_token >= remote_token {
        Symbol::First
    } else {
        Symbol::Second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_tokens_yield_complementary_roles() {
        let pairs = [(0, 1), (7, 42), (42, 7), (9_999, 0), (5, 9_998), (1, 2)];
        for (a, b) in pairs {
            let role_a = resolve_role(a, b);
            let role_b = resolve_role(b, a);
            assert_ne!(role_a, role_b, "tokens {a} vs {b} must split the roles");
        }
    }

    #[test]
    fn test_higher_token_plays_first() {
        assert_eq!(resolve_role(42, 7), Symbol::First);
        assert_eq!(resolve_role(7, 42), Symbol::Second);
    }

    #[test]
    fn test_tie_is_deterministic() {
        // Same rule on both sides: an exact tie maps to First either way.
        assert_eq!(resolve_role(7, 7), Symbol::First);
        assert_eq!(resolve_role(0, 0), Symbol::First);
    }

    #[test]
    fn test_drawn_tokens_stay_in_range() {
        for _ in 0..1_000 {
            assert!(draw_token() < TOKEN_SPACE);
        }
    }
}
