mod interface;
mod service;

pub use interface::*;
pub use service::*;
