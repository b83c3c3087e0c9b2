//! Periodic top-N task CPU load sampler.
//!
//! A [`session::Controller`] enables a [`task::TaskSource`], releases a
//! background sampling worker and waits for a newline on the console. Every
//! interval the worker ranks the busiest tasks with [`rank::select`] and
//! prints a table built by [`report::render_pass`].

pub mod config;
pub mod console;
pub mod format;
pub mod logging;
pub mod rank;
pub mod report;
pub mod sampler;
pub mod session;
pub mod system;
pub mod task;
