pub mod parse;
pub mod request;
pub mod response;
