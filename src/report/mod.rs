//! Console output.
//!
//! - [`progress`] — per-pass status lines and spinner on stderr; hidden with `--quiet`.
//! - [`terminal`] — colored summary and warning tables; respects `--verbose` / `--quiet`.

pub mod progress;
pub mod terminal;
