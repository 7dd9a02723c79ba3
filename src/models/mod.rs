pub mod file;
pub mod upload;
pub mod url;
