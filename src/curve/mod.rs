pub mod curve_loader;
pub mod error;
pub mod observer;
pub mod trajectory;
pub mod trajectory_builder;
