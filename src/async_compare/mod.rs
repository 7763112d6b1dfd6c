pub mod channel;
pub mod worker;

pub use channel::{CompareRequest, CompareResponse};
pub use worker::CompareWorker;
