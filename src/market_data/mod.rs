pub mod adapters;
pub mod error;
pub mod provider;
pub mod refresh;
pub mod resolver;
pub mod synthetic;
pub mod types;
