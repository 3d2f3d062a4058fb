pub mod camera;
pub mod cli;
pub mod core;
pub mod demo;
pub mod host;
pub mod traits;
