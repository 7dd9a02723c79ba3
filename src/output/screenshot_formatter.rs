use crate::local::{contains_md_supported_extension, is_text_file, Screenshot, DEFAULT_SAMPLE_SIZE};
use crate::output::color::ColorWriter;
use crate::output::file_formatter::format_size;
use std::io::Result;
use std::path::Path;
use termcolor::Color;

pub fn format_screenshots(
    screenshots: &[Screenshot],
    dir: &Path,
    writer: &mut ColorWriter,
) -> Result<()> {
    writer.print_header(&format!("Screenshots in {} ({})", dir.display(), screenshots.len()))?;
    writer.print_separator()?;

    if screenshots.is_empty() {
        writer.write("No screenshots found ¯\\_(ツ)_/¯")?;
        writer.writeln()?;
        return Ok(());
    }

    for (i, shot) in screenshots.iter().enumerate() {
        writer.print_colored(&format!("[{}] ", i), Color::Yellow)?;
        writer.print_colored(&shot.file, Color::Cyan)?;
        writer.write(" ")?;
        writer.print_colored(&format!("({})", preview_kind(&shot.path)), Color::Blue)?;
        writer.writeln()?;

        writer.write("    ")?;
        writer.write(&shot.last_modified_at.format("%Y-%m-%d %H:%M:%S").to_string())?;
        if let Ok(metadata) = std::fs::metadata(&shot.path) {
            writer.write(&format!("  {}", format_size(metadata.len())))?;
        }
        writer.writeln()?;
    }

    Ok(())
}

/// How the file would be previewed: as an image, as text, or not at all.
pub fn preview_kind(path: &Path) -> &'static str {
    if contains_md_supported_extension(&path.to_string_lossy()) {
        "image"
    } else if is_text_file(path, DEFAULT_SAMPLE_SIZE) {
        "text"
    } else {
        "binary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::get_screenshots;

    #[test]
    fn test_format_screenshots() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shot.png"), b"\x89PNG").unwrap();
        std::fs::write(dir.path().join("log.txt"), b"hello").unwrap();
        std::fs::write(dir.path().join("blob"), [0u8, 1, 2]).unwrap();

        let shots = get_screenshots(dir.path()).unwrap();
        let mut writer = ColorWriter::new(true);
        format_screenshots(&shots, dir.path(), &mut writer).unwrap();
        let out = writer.into_string().unwrap();

        assert!(out.contains("(3)"));
        assert!(out.contains("shot.png (image)"));
        assert!(out.contains("log.txt (text)"));
        assert!(out.contains("blob (binary)"));
    }

    #[test]
    fn test_format_no_screenshots() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ColorWriter::new(true);
        format_screenshots(&[], dir.path(), &mut writer).unwrap();
        assert!(writer.into_string().unwrap().contains("No screenshots found"));
    }
}
