pub mod clock;
pub mod config;
pub mod error;
pub mod event;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_dotenv, Config, DeliveryMode};
pub use error::*;
pub use event::*;
