pub mod errors;
pub mod retry;
pub mod shutdown;

pub use errors::*;
pub use retry::*;
pub use shutdown::*;
