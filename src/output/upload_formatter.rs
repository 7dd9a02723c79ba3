use crate::commands::QuickOutcome;
use crate::models::upload::{ShortenUrlResult, UploadResult};
use crate::output::color::ColorWriter;
use std::io::Result;

pub fn format_upload(result: &UploadResult, writer: &mut ColorWriter) -> Result<()> {
    writer.print_field("URL", &result.url)?;
    writer.print_field("ID", &result.id)?;
    writer.print_field("Type", &result.mime_type)?;
    Ok(())
}

pub fn format_shortened(result: &ShortenUrlResult, writer: &mut ColorWriter) -> Result<()> {
    writer.print_field("URL", &result.url)?;
    writer.print_field("Code", &result.code)?;
    writer.print_field("Destination", &result.destination)?;
    Ok(())
}

pub fn format_quick(outcome: &QuickOutcome, writer: &mut ColorWriter) -> Result<()> {
    match outcome {
        QuickOutcome::Uploaded(result) => format_upload(result, writer),
        QuickOutcome::Shortened(result) => format_shortened(result, writer),
    }
}
