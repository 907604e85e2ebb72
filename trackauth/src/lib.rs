extern crate serde_derive;

pub mod data;
pub mod dbfun;
pub mod error;
pub mod migrations;
pub mod util;
