pub mod error;
pub mod logger;
pub mod noise;
pub mod notify;
pub mod validation;
