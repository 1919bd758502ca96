//! Property-based suites: arithmetic laws for [`crate::math::Fp`] and the
//! book-level invariants that must hold over arbitrary operation sequences.
