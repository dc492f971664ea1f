pub mod current;
pub mod snapshot;
