pub mod bootstrap;
pub mod views;

pub use bootstrap::Application;
