mod session_header;
mod session_owner;

pub use session_header::*;
pub use session_owner::*;
