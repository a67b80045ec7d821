// Resume ingestion: extract text from an upload, embed it, append it to the store.

pub mod extract;
pub mod handlers;
pub mod service;
