//! Common utilities for the weathergraph toolkit: error types, geometry
//! helpers and text normalization shared by every other crate.

pub mod classes;
pub mod error;
pub mod geo;
pub mod text;

pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        let result = 2 + 2;
        assert_eq!(result, 4);
    }
}
