//! Row models mapped from the database.

pub mod trial;
