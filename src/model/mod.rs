pub mod account;
pub mod algorithm;
pub mod policy;
pub mod token;
