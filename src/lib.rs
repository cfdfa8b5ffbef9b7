pub mod detect;
pub mod display;
pub mod driver;
pub mod error;
pub mod source;
