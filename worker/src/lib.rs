pub mod client;
pub mod identity;
pub mod map;
pub mod reduce;
pub mod worker;

pub use client::CoordinatorClient;
pub use worker::{Step, Worker};
