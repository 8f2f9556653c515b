//! SeaORM entities.

pub mod order;
