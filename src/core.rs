pub mod http;
pub mod storage;
pub mod speech;
pub mod download;
pub mod page;
pub mod features;
