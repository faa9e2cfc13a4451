//! AOI Store - Candidate source port and adapters
//!
//! Storage is owned by the surrounding system. This crate defines the port the
//! query layer fetches candidates through, the lifecycle rules every backend
//! applies on write, and an in-memory adapter for development and tests.

pub mod lifecycle;
pub mod memory;
pub mod ports;

pub use memory::MemoryAoiStore;
pub use ports::AoiRepository;
