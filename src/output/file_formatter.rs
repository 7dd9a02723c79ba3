use crate::local::file_url;
use crate::models::file::{FileInfo, RichFileInfo, RichPage};
use crate::output::color::ColorWriter;
use crate::output::width::get_wrap_width_with_indent;
use chrono::{DateTime, Local, Utc};
use std::io::Result;
use termcolor::Color;
use textwrap::wrap;

const PREVIEW_LINES: usize = 12;

pub fn format_files_page(page: &RichPage, base_url: &str, writer: &mut ColorWriter) -> Result<()> {
    writer.print_header(&format!(
        "Files (page {} of {}, {} total)",
        page.page, page.pages, page.total
    ))?;
    writer.print_separator()?;

    if page.items.is_empty() {
        writer.write("No files found. Upload some files first.")?;
        writer.writeln()?;
        return Ok(());
    }

    for (i, item) in page.items.iter().enumerate() {
        format_file_entry(item, base_url, writer)?;

        if i < page.items.len() - 1 {
            writer.writeln()?;
        }
    }

    if page.has_more() {
        writer.writeln()?;
        writer.print_colored(
            &format!("More files: zipline files list --page {}", page.page + 1),
            Color::Yellow,
        )?;
        writer.writeln()?;
    }

    Ok(())
}

fn format_file_entry(item: &RichFileInfo, base_url: &str, writer: &mut ColorWriter) -> Result<()> {
    let file = &item.file_info;

    writer.print_colored(&file.name, Color::Cyan)?;
    writer.write(" ")?;
    writer.print_colored(&format!("({})", file.mime_type), Color::Yellow)?;
    if file.favorite {
        writer.print_colored(" ★", Color::Yellow)?;
    }
    if file.is_password_protected() {
        writer.print_colored(" 🔒", Color::Red)?;
    }
    writer.writeln()?;

    writer.print_item_field("ID", &file.id)?;
    if let Some(original) = file.original_name.as_deref().filter(|n| !n.is_empty()) {
        writer.print_item_field("Original name", original)?;
    }
    writer.print_item_field("Size", &format_size(file.size))?;
    writer.print_item_field("Views", &format_views(file))?;
    writer.print_item_field("Uploaded", &format_time(&file.created_at))?;
    if let Some(deletes_at) = &file.deletes_at {
        writer.print_item_field("Deletes at", &format_time(deletes_at))?;
    }
    if !file.tags.is_empty() {
        let tags: Vec<&str> = file.tags.iter().map(|t| t.name.as_str()).collect();
        writer.print_item_field("Tags", &tags.join(", "))?;
    }
    writer.print_item_field("Link", &file_url(base_url, &file.url))?;

    format_preview(item, writer)
}

fn format_preview(item: &RichFileInfo, writer: &mut ColorWriter) -> Result<()> {
    let content = match &item.file_content {
        Some(content) => content.as_str(),
        None => return Ok(()),
    };

    writer.write("  ")?;
    writer.print_colored("Preview:", Color::Blue)?;
    writer.writeln()?;

    let text = if content.trim().is_empty() { "(empty)" } else { content };

    let width = get_wrap_width_with_indent(4).max(20);
    let mut lines = text.lines().flat_map(|line| {
        if line.is_empty() {
            vec![String::new()]
        } else {
            wrap(line, width).into_iter().map(|l| l.into_owned()).collect()
        }
    });

    for line in lines.by_ref().take(PREVIEW_LINES) {
        writer.write("    ")?;
        writer.write(&line)?;
        writer.writeln()?;
    }
    if lines.next().is_some() {
        writer.write("    ")?;
        writer.print_colored("…", Color::White)?;
        writer.writeln()?;
    }

    Ok(())
}

fn format_views(file: &FileInfo) -> String {
    match file.max_views {
        Some(max) => format!("{} / {}", file.views, max),
        None => file.views.to_string(),
    }
}

pub fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file::Tag;

    fn create_test_file() -> FileInfo {
        serde_json::from_str(
            r#"{"id": "f1", "createdAt": "2024-05-01T10:00:00.000Z", "updatedAt": "2024-05-01T10:00:00.000Z", "deletesAt": null, "name": "notes.txt", "originalName": "my notes.txt", "type": "text/plain", "favorite": true, "views": 3, "maxViews": 10, "folderId": null, "size": 1536, "password": null, "thumbnail": null, "tags": [], "url": "/u/notes.txt"}"#,
        )
        .unwrap()
    }

    fn render(page: &RichPage) -> String {
        let mut writer = ColorWriter::new(true);
        format_files_page(page, "https://z.example.com", &mut writer).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn test_format_files_page() {
        let mut file = create_test_file();
        file.tags.push(Tag {
            id: "t1".to_string(),
            name: "work".to_string(),
        });
        let page = RichPage {
            items: vec![RichFileInfo {
                file_info: file,
                file_content: Some("hello\nworld".to_string()),
            }],
            page: 1,
            pages: 2,
            total: 16,
        };

        let out = render(&page);
        assert!(out.contains("Files (page 1 of 2, 16 total)"));
        assert!(out.contains("notes.txt (text/plain) ★"));
        assert!(out.contains("Original name: my notes.txt"));
        assert!(out.contains("Size: 1.50 KB"));
        assert!(out.contains("Views: 3 / 10"));
        assert!(out.contains("Tags: work"));
        assert!(out.contains("Link: https://z.example.com/u/notes.txt"));
        assert!(out.contains("    hello\n    world\n"));
        assert!(out.contains("zipline files list --page 2"));
    }

    #[test]
    fn test_format_empty_page() {
        let page = RichPage {
            items: vec![],
            page: 1,
            pages: 0,
            total: 0,
        };
        assert!(render(&page).contains("No files found"));
    }

    #[test]
    fn test_preview_is_truncated() {
        let content: Vec<String> = (0..30).map(|i| format!("line {}", i)).collect();
        let page = RichPage {
            items: vec![RichFileInfo {
                file_info: create_test_file(),
                file_content: Some(content.join("\n")),
            }],
            page: 1,
            pages: 1,
            total: 1,
        };

        let out = render(&page);
        assert!(out.contains("line 11"));
        assert!(!out.contains("line 12"));
        assert!(out.contains("…"));
        assert!(!out.contains("More files"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1572864), "1.50 MB");
        assert_eq!(format_size(1610612736), "1.50 GB");
    }
}
