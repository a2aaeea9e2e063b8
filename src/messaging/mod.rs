pub mod client;
pub mod composer;
