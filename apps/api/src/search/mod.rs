// Free-text resume search over the stored embeddings.

pub mod handlers;
pub mod service;
