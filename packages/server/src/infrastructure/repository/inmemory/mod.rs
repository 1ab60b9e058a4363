//! In-memory repository implementations.

pub mod membership;

pub use membership::InMemoryMembershipRepository;
