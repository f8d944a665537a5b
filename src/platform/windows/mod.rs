pub mod constants;
pub mod signal;

pub use constants::*;
pub use signal::*;
