pub mod http;
pub mod messaging;
