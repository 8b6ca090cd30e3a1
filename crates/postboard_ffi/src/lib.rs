//! Flutter bridge crate for Postboard.
//!
//! All exported functions live in [`api`] and are synchronous; the Dart side
//! treats every call as a short, blocking use-case invocation.

pub mod api;
