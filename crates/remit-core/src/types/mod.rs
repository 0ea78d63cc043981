//! Shared types: fast hash collections and the record shapes exchanged with
//! the producer (835 parser) and consumer (reporting) collaborators.

pub mod collections;
pub mod records;
