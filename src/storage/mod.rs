pub mod cache;
pub mod document_store;
