//! Lexora backend: a retrieval-augmented legal Q&A service.
//!
//! Documents are embedded into a dual-namespace persisted vector store
//! ("system" knowledge base + "user" context), the closest passages are
//! retrieved for each query, and an OpenAI-compatible chat endpoint is
//! asked for a JSON answer grounded strictly in that context.

pub mod core;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod llm;
pub mod rag;
pub mod seed;
pub mod server;
pub mod state;
pub mod store;
