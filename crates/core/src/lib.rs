pub mod clock;
pub mod config;
pub mod error;
pub mod record;
pub mod tier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::*;
pub use record::*;
pub use tier::*;
