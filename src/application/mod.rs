// Application layer: the ledger store and the types it hands to front ends.

pub mod error;
pub mod message;
pub mod reporting;
pub mod service;

pub use error::*;
pub use message::*;
pub use reporting::*;
pub use service::*;
