pub mod store;
pub mod token;
pub mod validity;
