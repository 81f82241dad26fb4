//! Scenario-level simulation tests.
//!
//! Run with: `cargo test --test simulation`

mod corpus;
mod scenarios;
