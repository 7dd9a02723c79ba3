use crate::local::short_url;
use crate::models::url::UrlInfo;
use crate::output::color::ColorWriter;
use crate::output::file_formatter::format_time;
use crate::output::width::{get_wrap_width_with_indent, truncate};
use std::io::Result;
use termcolor::Color;

pub fn format_urls_list(urls: &[UrlInfo], base_url: &str, writer: &mut ColorWriter) -> Result<()> {
    writer.print_header(&format!("Short URLs ({})", urls.len()))?;
    writer.print_separator()?;

    if urls.is_empty() {
        writer.write("No shortened URLs. Use `zipline shorten <URL>` to create one.")?;
        writer.writeln()?;
        return Ok(());
    }

    let destination_width = get_wrap_width_with_indent(15).max(30);

    for (i, url) in urls.iter().enumerate() {
        writer.print_colored(url.slug(), Color::Cyan)?;
        if !url.enabled {
            writer.write(" ")?;
            writer.print_colored("(disabled)", Color::Red)?;
        }
        writer.writeln()?;

        writer.print_item_field("ID", &url.id)?;
        writer.print_item_field("Short URL", &short_url(base_url, url))?;
        writer.print_item_field("Destination", &truncate(&url.destination, destination_width))?;
        writer.print_item_field("Views", &format_views(url))?;
        writer.print_item_field("Status", if url.enabled { "Enabled" } else { "Disabled" })?;
        writer.print_item_field("Created", &format_time(&url.created_at))?;

        if i < urls.len() - 1 {
            writer.writeln()?;
        }
    }

    Ok(())
}

fn format_views(url: &UrlInfo) -> String {
    match url.max_views {
        Some(max) => format!("{} / {}", url.views, max),
        None => url.views.to_string(),
    }
}
