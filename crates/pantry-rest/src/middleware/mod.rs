//! HTTP middleware.

mod logging;
mod rate_limit;
mod timeout;

pub use logging::*;
pub use rate_limit::*;
pub use timeout::*;
