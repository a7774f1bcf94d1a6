pub mod catalog;
pub mod engine;
pub mod rpc;
pub mod tools;
