//! Infrastructure layer: concrete implementations of domain abstractions.

pub mod repository;
