pub mod appointment;
pub mod enums;
pub mod message;
pub mod report;
pub mod vital_sign;

pub use appointment::*;
pub use enums::*;
pub use message::*;
pub use report::*;
pub use vital_sign::*;
