//! Dual-namespace vector store: per-namespace corpus stores plus the
//! manager facade the rest of the service talks to.

pub mod corpus;
pub mod manager;

pub use corpus::CorpusStore;
pub use manager::VectorStoreManager;
