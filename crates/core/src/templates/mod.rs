pub mod discovery;
pub mod engine;
pub mod repository;
