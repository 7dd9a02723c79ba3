use anyhow::Result;
use minus::Pager;
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

/// Where rendered listings go: the `minus` pager on a terminal, stdout when
/// piped or when paging is disabled.
pub enum OutputDestination {
    Pager(Pager),
    Direct(Vec<u8>),
}

impl OutputDestination {
    pub fn new(no_pager: bool) -> Self {
        if !no_pager && atty::is(atty::Stream::Stdout) {
            OutputDestination::Pager(Pager::new())
        } else {
            OutputDestination::Direct(Vec::new())
        }
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        match self {
            OutputDestination::Pager(pager) => {
                write!(pager, "{}", s).map_err(|e| anyhow::anyhow!("Pager write error: {}", e))?;
            }
            OutputDestination::Direct(buffer) => buffer.write_all(s.as_bytes())?,
        }
        Ok(())
    }

    /// Show the output; blocks until the user quits the pager.
    pub fn finish(self) -> Result<()> {
        match self {
            OutputDestination::Pager(pager) => {
                minus::page_all(pager).map_err(|e| anyhow::anyhow!("Pager error: {}", e))
            }
            OutputDestination::Direct(buffer) => {
                std::io::stdout().write_all(&buffer)?;
                Ok(())
            }
        }
    }
}

/// Write `text` through the pager unless it fits comfortably on screen.
pub fn show(text: &str, no_pager: bool) -> Result<()> {
    let short = text.lines().count() < terminal_height().unwrap_or(usize::MAX);
    let mut output = OutputDestination::new(no_pager || short);
    output.write_str(text)?;
    output.finish()
}

fn terminal_height() -> Option<usize> {
    terminal_size::terminal_size().map(|(_, terminal_size::Height(h))| h as usize)
}
