//! Side effects that follow an API call: clipboard, browser and notices.
//!
//! The API client never touches these. Presentation code decides when to run
//! them through a [`Dispatcher`], which applies the user's preferences.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::config::Preferences;
use crate::models::upload::{ShortenUrlResult, UploadResult};
use crate::output::color::ColorWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Success,
    Failure,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub style: NoticeStyle,
    pub title: String,
    pub message: Option<String>,
}

/// What the clipboard currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardContent {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
}

impl ClipboardContent {
    pub fn is_empty(&self) -> bool {
        self.file.is_none() && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

pub trait Effects {
    fn copy_to_clipboard(&self, text: &str) -> Result<()>;
    fn open_url(&self, url: &str) -> Result<()>;
    fn notify(&self, notice: Notice);
    fn read_clipboard(&self) -> Result<ClipboardContent>;
}

impl<T: Effects + ?Sized> Effects for &T {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        (**self).copy_to_clipboard(text)
    }

    fn open_url(&self, url: &str) -> Result<()> {
        (**self).open_url(url)
    }

    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }

    fn read_clipboard(&self) -> Result<ClipboardContent> {
        (**self).read_clipboard()
    }
}

/// Runs the platform clipboard and browser tools and prints notices to stderr.
pub struct SystemEffects {
    no_color: bool,
}

impl SystemEffects {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }
}

fn copy_commands() -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        vec![("pbcopy", vec![])]
    } else if cfg!(target_os = "windows") {
        vec![("clip", vec![])]
    } else {
        vec![
            ("wl-copy", vec![]),
            ("xclip", vec!["-selection", "clipboard"]),
            ("xsel", vec!["--clipboard", "--input"]),
        ]
    }
}

fn paste_commands() -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        vec![("pbpaste", vec![])]
    } else if cfg!(target_os = "windows") {
        vec![("powershell", vec!["-NoProfile", "-Command", "Get-Clipboard"])]
    } else {
        vec![
            ("wl-paste", vec!["--no-newline"]),
            ("xclip", vec!["-selection", "clipboard", "-o"]),
            ("xsel", vec!["--clipboard", "--output"]),
        ]
    }
}

fn file_reference_commands() -> Vec<(&'static str, Vec<&'static str>)> {
    if cfg!(target_os = "macos") {
        vec![(
            "osascript",
            vec!["-e", "POSIX path of (the clipboard as «class furl»)"],
        )]
    } else if cfg!(target_os = "windows") {
        vec![(
            "powershell",
            vec![
                "-NoProfile",
                "-Command",
                "Get-Clipboard -Format FileDropList | Select-Object -First 1 -ExpandProperty FullName",
            ],
        )]
    } else {
        vec![
            ("wl-paste", vec!["--no-newline", "--type", "text/uri-list"]),
            ("xclip", vec!["-selection", "clipboard", "-t", "text/uri-list", "-o"]),
        ]
    }
}

/// Run the first tool that exists and succeeds, returning its stdout.
fn run_first(commands: &[(&str, Vec<&str>)]) -> Result<String> {
    let mut last_error = None;

    for (program, args) in commands {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
            }
            Ok(output) => {
                last_error = Some(anyhow::anyhow!("{} exited with {}", program, output.status));
            }
            Err(e) => last_error = Some(anyhow::anyhow!("{}: {}", program, e)),
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("no clipboard tool available")))
}

/// Feed `input` to the first tool that exists and succeeds.
///
/// Copy tools on X11 and Wayland fork a process that keeps serving the
/// selection, so their stdout is not captured and only the direct child is
/// waited on.
fn pipe_to_first(commands: &[(&str, Vec<&str>)], input: &str) -> Result<()> {
    let mut last_error = None;

    for (program, args) in commands {
        let spawned = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                last_error = Some(anyhow::anyhow!("{}: {}", program, e));
                continue;
            }
        };

        // stdin is dropped at the end of this block so the tool sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(input.as_bytes()),
            None => Ok(()),
        };

        if let Err(e) = written {
            let _ = child.kill();
            let _ = child.wait();
            last_error = Some(anyhow::anyhow!("{}: {}", program, e));
            continue;
        }

        match child.wait() {
            Ok(status) if status.success() => return Ok(()),
            Ok(status) => last_error = Some(anyhow::anyhow!("{} exited with {}", program, status)),
            Err(e) => last_error = Some(anyhow::anyhow!("{}: {}", program, e)),
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("no clipboard tool available")))
}

/// Turn `file:///...` URIs or plain absolute paths into a path.
pub fn parse_file_reference(raw: &str) -> Option<PathBuf> {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))?;

    if line.starts_with("file://") {
        return reqwest::Url::parse(line).ok()?.to_file_path().ok();
    }

    let path = PathBuf::from(line);
    if path.is_absolute() && path.exists() {
        Some(path)
    } else {
        None
    }
}

impl Effects for SystemEffects {
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        pipe_to_first(&copy_commands(), text).context("Failed to copy to clipboard")
    }

    fn open_url(&self, url: &str) -> Result<()> {
        let launched = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).status()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", url]).status()
        } else {
            Command::new("xdg-open").arg(url).status()
        };
        let status = launched.context("Failed to launch browser")?;

        if !status.success() {
            anyhow::bail!("Failed to open {} in browser", url);
        }
        Ok(())
    }

    fn notify(&self, notice: Notice) {
        let mut writer = ColorWriter::new(self.no_color);
        let line = match &notice.message {
            Some(message) => format!("{}: {}", notice.title, message),
            None => notice.title.clone(),
        };

        let written = match notice.style {
            NoticeStyle::Success => writer.print_success(&line),
            NoticeStyle::Failure => writer.print_error(&line),
            NoticeStyle::Warning => writer.print_warning(&line),
        };

        if written.is_ok() {
            if let Ok(text) = writer.into_string() {
                eprint!("{}", text);
            }
        }
    }

    fn read_clipboard(&self) -> Result<ClipboardContent> {
        let file = run_first(&file_reference_commands())
            .ok()
            .and_then(|raw| parse_file_reference(&raw));

        let text = match run_first(&paste_commands()) {
            Ok(text) => Some(text).filter(|t| !t.is_empty()),
            // A clipboard holding only a file may have no text flavour.
            Err(_) if file.is_some() => None,
            Err(e) => return Err(e.context("Failed to read clipboard")),
        };

        Ok(ClipboardContent { text, file })
    }
}

/// Failure notice for an error, including its context chain.
pub fn failure_notice(error: &anyhow::Error) -> Notice {
    Notice {
        style: NoticeStyle::Failure,
        title: format!("{:#}", error),
        message: None,
    }
}

/// Applies the copy/open preferences after successful calls and reports
/// outcomes as notices.
pub struct Dispatcher<E: Effects> {
    effects: E,
    copy_to_clipboard: bool,
    open_in_browser: bool,
}

impl<E: Effects> Dispatcher<E> {
    pub fn new(preferences: &Preferences, effects: E) -> Self {
        Self {
            effects,
            copy_to_clipboard: preferences.copy_to_clipboard,
            open_in_browser: preferences.open_in_browser,
        }
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn upload_succeeded(&self, result: &UploadResult) {
        self.link_created(&result.url, "Upload successful!");
    }

    pub fn shorten_succeeded(&self, result: &ShortenUrlResult) {
        self.link_created(&result.url, "URL shortened successfully!");
    }

    fn link_created(&self, url: &str, headline: &str) {
        let mut title = headline.to_string();

        if self.copy_to_clipboard {
            match self.effects.copy_to_clipboard(url) {
                Ok(()) => title.push_str(" Link copied to clipboard."),
                Err(e) => self.warn("Could not copy link", &e),
            }
        }

        if self.open_in_browser {
            if let Err(e) = self.effects.open_url(url) {
                self.warn("Could not open browser", &e);
            }
        }

        self.effects.notify(Notice {
            style: NoticeStyle::Success,
            title,
            message: None,
        });
    }

    pub fn succeeded(&self, title: &str) {
        self.effects.notify(Notice {
            style: NoticeStyle::Success,
            title: title.to_string(),
            message: None,
        });
    }

    fn warn(&self, title: &str, error: &anyhow::Error) {
        self.effects.notify(Notice {
            style: NoticeStyle::Warning,
            title: title.to_string(),
            message: Some(format!("{:#}", error)),
        });
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{preferences, RecordingEffects};
    use super::*;

    fn upload_result() -> UploadResult {
        UploadResult {
            url: "https://x/y".to_string(),
            id: "a".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_upload_succeeded_copies_and_opens() {
        let dispatcher = Dispatcher::new(&preferences(true, true), RecordingEffects::default());
        dispatcher.upload_succeeded(&upload_result());

        let effects = dispatcher.effects();
        assert_eq!(effects.clipboard().as_deref(), Some("https://x/y"));
        assert_eq!(effects.opened(), vec!["https://x/y".to_string()]);
        assert_eq!(
            effects.notices()[0].title,
            "Upload successful! Link copied to clipboard."
        );
    }

    #[test]
    fn test_preferences_disable_effects() {
        let dispatcher = Dispatcher::new(&preferences(false, false), RecordingEffects::default());
        dispatcher.shorten_succeeded(&ShortenUrlResult {
            url: "https://z/go/s".to_string(),
            code: "s".to_string(),
            destination: "https://e.com".to_string(),
        });

        let effects = dispatcher.effects();
        assert_eq!(effects.clipboard(), None);
        assert!(effects.opened().is_empty());
        assert_eq!(effects.notices()[0].title, "URL shortened successfully!");
    }

    #[test]
    fn test_copy_failure_is_a_warning() {
        let effects = RecordingEffects {
            fail_copy: true,
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(&preferences(true, false), effects);
        dispatcher.upload_succeeded(&upload_result());

        let notices = dispatcher.effects().notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].style, NoticeStyle::Warning);
        assert_eq!(notices[1].style, NoticeStyle::Success);
        assert_eq!(notices[1].title, "Upload successful!");
    }

    #[test]
    fn test_parse_file_reference() {
        assert_eq!(
            parse_file_reference("file:///tmp/My%20Shot.png\n"),
            Some(PathBuf::from("/tmp/My Shot.png"))
        );
        assert_eq!(
            parse_file_reference("# comment\nfile:///var/folders/x/Image.png"),
            Some(PathBuf::from("/var/folders/x/Image.png"))
        );
        assert_eq!(parse_file_reference("just some text"), None);
        assert_eq!(parse_file_reference(""), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_does_not_wait_for_forked_server() {
        let commands = [("sh", vec!["-c", "cat >/dev/null; (sleep 5) & exit 0"])];

        let started = std::time::Instant::now();
        pipe_to_first(&commands, "https://x/y").unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_falls_through_to_next_tool() {
        let commands = [
            ("zipline-no-such-clipboard-tool", vec![]),
            ("sh", vec!["-c", "cat >/dev/null; exit 1"]),
            ("sh", vec!["-c", "cat >/dev/null"]),
        ];
        pipe_to_first(&commands, "text").unwrap();

        let err = pipe_to_first(&commands[..2], "text").unwrap_err();
        assert!(err.to_string().contains("exited with"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_first_returns_stdout() {
        let commands = [
            ("zipline-no-such-clipboard-tool", vec![]),
            ("sh", vec!["-c", "printf 'file:///tmp/a.png'"]),
        ];
        assert_eq!(run_first(&commands).unwrap(), "file:///tmp/a.png");
    }

    #[test]
    fn test_failure_notice_includes_context() {
        let err = anyhow::anyhow!("Payload Too Large").context("Upload failed");
        let notice = failure_notice(&err);
        assert_eq!(notice.style, NoticeStyle::Failure);
        assert_eq!(notice.title, "Upload failed: Payload Too Large");
        assert_eq!(notice.message, None);
    }

    #[test]
    fn test_clipboard_content_is_empty() {
        assert!(ClipboardContent::default().is_empty());
        assert!(ClipboardContent {
            text: Some("  \n".to_string()),
            file: None
        }
        .is_empty());
        assert!(!ClipboardContent {
            text: Some("hi".to_string()),
            file: None
        }
        .is_empty());
    }
}
