//! Resume ranking pipeline

pub mod embedding_manager;
pub mod embeddings;
pub mod entities;
pub mod ranker;
pub mod resume_fields;
pub mod text_processor;
