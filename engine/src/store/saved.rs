mod handler;
mod proto;

pub use handler::*;
pub use proto::*;
