pub mod symbolize;

pub use symbolize::*;
