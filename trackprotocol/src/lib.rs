#[macro_use]
extern crate serde_derive;

pub mod content;
pub mod messages;
pub mod sync_data;
