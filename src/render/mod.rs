pub(crate) mod backend;
pub(crate) mod mask;
pub(crate) mod sink;
