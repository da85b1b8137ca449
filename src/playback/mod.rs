pub(crate) mod player;
pub(crate) mod scheduler;
pub(crate) mod timeline;
pub(crate) mod view;
pub(crate) mod width;
