//! Flutter-facing FFI crate for the QuickTask core.

pub mod api;
