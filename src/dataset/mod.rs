//! Persisted form of captured characters (schema version 1).

pub(crate) mod io;
pub(crate) mod model;
