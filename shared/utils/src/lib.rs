pub mod auth;
pub mod bom;
pub mod config;
pub mod drawings;
pub mod error;
pub mod logging;
pub mod uploads;
pub mod validation;

pub use auth::*;
pub use config::*;
pub use drawings::*;
pub use error::*;
pub use logging::*;
pub use uploads::*;
pub use validation::*;
