//! Purpose: Shared core library crate used by the `jsonsift` CLI and tests.
//! Exports: `core` (tolerant extraction, repair pipeline, stream helpers, errors).
//! Role: Internal library backing the binary; not yet a stable public SDK.
//! Invariants: Treat the crate API as internal until a dedicated library release.
//! Invariants: Core functions are pure text transforms with no hidden state.
pub mod core;
