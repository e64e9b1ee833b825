//! Command line driver for the bcz validator.

pub mod args;
pub mod driver;
pub mod reporter;

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod reporter_tests;
