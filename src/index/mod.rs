pub mod flatten;
pub mod index_store;
