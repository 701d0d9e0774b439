mod expense;
mod filter;
mod money;

pub use expense::*;
pub use filter::*;
pub use money::*;
