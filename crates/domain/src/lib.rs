#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod catalog;
mod duration;
mod equipment;
mod error;
mod exercise;
mod focus;
mod name;
mod plan;
mod schedule;
mod service;
mod session_type;
mod settings;

pub use catalog::*;
pub use duration::*;
pub use equipment::*;
pub use error::*;
pub use exercise::*;
pub use focus::*;
pub use name::*;
pub use plan::*;
pub use schedule::*;
pub use service::*;
pub use session_type::*;
pub use settings::*;
