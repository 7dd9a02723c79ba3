pub mod client;
pub mod files;
pub mod upload;
pub mod urls;

pub use client::ZiplineClient;
