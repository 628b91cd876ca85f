//! In-process adapters backed by memory.

mod directory_repository;

pub use directory_repository::InMemoryDirectoryRepository;
