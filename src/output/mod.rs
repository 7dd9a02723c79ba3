pub mod color;
pub mod file_formatter;
pub mod formatter;
pub mod pager;
pub mod screenshot_formatter;
pub mod upload_formatter;
pub mod url_formatter;
pub mod width;
