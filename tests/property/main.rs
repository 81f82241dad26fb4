//! Property-based invariant tests for the scheduling engine.
//!
//! Run with: `cargo test --features sim-proptest --test property`
//! Set `PROPTEST_CASES` to raise the case count.

mod engine_invariants;
