mod session;
mod transcript;

pub use session::*;
pub use transcript::*;
