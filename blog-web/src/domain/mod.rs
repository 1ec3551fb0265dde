pub(crate) mod comment;
pub(crate) mod error;
pub(crate) mod post;
pub(crate) mod taxonomy;
pub(crate) mod user;
