//! Pointer input capture and the per-character capture session.

pub(crate) mod buffer;
pub(crate) mod session;
