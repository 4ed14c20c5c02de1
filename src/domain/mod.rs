mod appointment;
mod error;
mod money;
mod payment;
mod period;
mod timestamp;
pub mod validation;
mod viewer;

pub use appointment::*;
pub use error::*;
pub use money::*;
pub use payment::*;
pub use period::*;
pub use timestamp::*;
pub use viewer::*;
