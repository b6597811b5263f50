mod reading;
mod subscriber;
mod user_session;

pub use reading::*;
pub use subscriber::*;
pub use user_session::*;
