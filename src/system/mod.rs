pub mod collector;
pub mod delta;
pub mod platform;

pub use collector::SysinfoSource;
