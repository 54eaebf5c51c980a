//! Adapters implementing domain ports.
//!
//! Persistence adapters implement [`crate::ports::TableRepository`]; the
//! simulated castle implements [`crate::ports::Environment`].

pub mod in_memory_repository;
pub mod msgpack_repository;
pub mod simulated_castle;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
pub use simulated_castle::{CastleRules, GuardProfile, SimulatedCastle};
