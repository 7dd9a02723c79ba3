use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::upload::UploadOptions;

#[derive(Parser)]
#[command(name = "zipline")]
#[command(about = "Upload files, text and screenshots to Zipline and shorten URLs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Zipline instance URL (e.g., https://zipline.example.com)
    #[arg(long, global = true, env = "ZIPLINE_BASE_URL")]
    pub base_url: Option<String>,

    /// API token, sent verbatim in the Authorization header
    #[arg(long, global = true, env = "ZIPLINE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Config file (default: <config dir>/zipline/config.yaml)
    #[arg(long, global = true, env = "ZIPLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not copy resulting links to the clipboard
    #[arg(long, global = true)]
    pub no_copy: bool,

    /// Open resulting links in the default browser
    #[arg(long, global = true)]
    pub open: bool,

    /// Disable colorized output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Disable the pager for long listings
    #[arg(long, global = true)]
    pub no_pager: bool,

    /// Output format (human, json, yaml)
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a local file
    Upload {
        /// Path of the file to upload
        path: PathBuf,

        /// Send the file as image.png regardless of its name
        #[arg(long)]
        force_image: bool,

        #[command(flatten)]
        options: UploadArgs,
    },
    /// Upload text as text.txt
    Text {
        /// Text to upload; reads stdin when omitted or "-"
        text: Option<String>,

        #[command(flatten)]
        options: UploadArgs,
    },
    /// Upload the clipboard: files are uploaded, URLs shortened, text uploaded
    Clipboard {
        /// Send a clipboard file as image.png
        #[arg(long)]
        force_image: bool,

        #[command(flatten)]
        options: UploadArgs,
    },
    /// Shorten a URL
    Shorten {
        /// URL to shorten (must start with http:// or https://); defaults to a
        /// URL on the clipboard
        url: Option<String>,

        /// Custom alias for the short URL
        #[arg(long)]
        vanity: Option<String>,

        /// Protect the short link with a password
        #[arg(long)]
        password: Option<String>,

        /// Maximum number of views before the link stops working
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_views: Option<u32>,
    },
    /// Browse and manage uploaded files
    Files {
        #[command(subcommand)]
        command: FilesCommands,
    },
    /// Manage shortened URLs
    Urls {
        #[command(subcommand)]
        command: UrlsCommands,
    },
    /// List and upload files from the screenshot directory
    Screenshots {
        #[command(subcommand)]
        command: ScreenshotsCommands,
    },
}

/// Upload modifiers shared by every upload command.
#[derive(Args, Debug, Clone, Default)]
pub struct UploadArgs {
    /// When the server should delete the file (e.g., 1d, 2h, or a date)
    #[arg(long)]
    pub deletes_at: Option<String>,

    /// Password required to view the file
    #[arg(long)]
    pub password: Option<String>,

    /// Maximum number of views before the file is deleted
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_views: Option<u32>,

    /// Folder ID to upload into
    #[arg(long)]
    pub folder: Option<String>,
}

impl From<UploadArgs> for UploadOptions {
    fn from(args: UploadArgs) -> Self {
        UploadOptions {
            deletes_at: args.deletes_at,
            password: args.password,
            max_views: args.max_views,
            folder: args.folder,
        }
    }
}

#[derive(Subcommand)]
pub enum FilesCommands {
    /// List uploaded files, newest first
    List {
        /// Page number (starts at 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Files per page
        #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
        per_page: u64,

        /// Fetch text previews for text-like files
        #[arg(long)]
        preview: bool,
    },
    /// Delete an uploaded file
    Delete {
        /// File ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum UrlsCommands {
    /// List shortened URLs
    List,
    /// Delete a shortened URL
    Delete {
        /// URL ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ScreenshotsCommands {
    /// List files in the screenshot directory, newest first
    List {
        /// Directory to scan instead of the configured one
        #[arg(long, env = "ZIPLINE_SCREENSHOT_DIR")]
        dir: Option<String>,

        /// Maximum number of files to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show the preview of a screenshot
    Preview {
        /// Position in the listing (0 = newest)
        #[arg(default_value = "0")]
        index: usize,

        #[arg(long, env = "ZIPLINE_SCREENSHOT_DIR")]
        dir: Option<String>,
    },
    /// Upload a screenshot
    Upload {
        /// Position in the listing (0 = newest)
        #[arg(default_value = "0")]
        index: usize,

        #[arg(long, env = "ZIPLINE_SCREENSHOT_DIR")]
        dir: Option<String>,

        #[command(flatten)]
        options: UploadArgs,
    },
}
