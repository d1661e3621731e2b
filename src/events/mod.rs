mod pointer;
mod session;

pub use pointer::*;
pub use session::*;
