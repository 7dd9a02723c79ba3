use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use zipline_cli::api::{self, ZiplineClient};
use zipline_cli::cli::{Cli, Commands, FilesCommands, ScreenshotsCommands, UrlsCommands};
use zipline_cli::commands;
use zipline_cli::config::{self, Overrides, Preferences};
use zipline_cli::effects::{failure_notice, Dispatcher, Effects, SystemEffects};
use zipline_cli::local;
use zipline_cli::models::upload::{ShortenUrlOptions, UploadContent, UploadOptions};
use zipline_cli::output;
use zipline_cli::output::color::ColorWriter;
use zipline_cli::output::formatter::{get_formatter, Formatter};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("zipline_cli={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Print `data` as JSON/YAML, or render it with `human` for the default format.
fn emit<T, F>(cli: &Cli, data: &T, human: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&mut ColorWriter) -> std::io::Result<()>,
{
    let formatter = get_formatter(&cli.format);
    if let Some(text) = formatter.format(data)? {
        println!("{}", text);
        return Ok(());
    }

    let mut writer = ColorWriter::new(cli.no_color);
    human(&mut writer)?;
    print!("{}", writer.into_string()?);
    Ok(())
}

/// Like `emit`, but long human output goes through the pager.
fn emit_paged<T, F>(cli: &Cli, data: &T, human: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&mut ColorWriter) -> std::io::Result<()>,
{
    if get_formatter(&cli.format) != Formatter::Human {
        return emit(cli, data, human);
    }

    let mut writer = ColorWriter::new(cli.no_color);
    human(&mut writer)?;
    output::pager::show(&writer.into_string()?, cli.no_pager)
}

fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }

    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Could not ask for confirmation; run with --yes to skip the prompt")
}

fn read_text_argument(text: Option<String>) -> Result<String> {
    let text = match text.as_deref() {
        None | Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            buffer
        }
        Some(t) => t.to_string(),
    };

    if text.trim().is_empty() {
        anyhow::bail!("Nothing to upload: text is empty");
    }
    Ok(text)
}

fn overrides(cli: &Cli, screenshot_dir: Option<String>) -> Overrides {
    Overrides {
        base_url: cli.base_url.clone(),
        api_token: cli.token.clone(),
        screenshot_dir,
        no_copy: cli.no_copy,
        open: cli.open,
    }
}

async fn run<E: Effects>(cli: &Cli, effects: E) -> Result<()> {
    let file_config = config::load_config(cli.config.as_deref())?;

    // Screenshot browsing is local and works without server settings.
    match &cli.command {
        Commands::Screenshots {
            command: ScreenshotsCommands::List { dir, limit },
        } => {
            let dir = config::resolve_screenshot_dir(&file_config, dir.as_deref());
            let mut screenshots = local::get_screenshots(&dir)?;
            screenshots.truncate(*limit);

            return emit_paged(cli, &screenshots, |w| {
                output::screenshot_formatter::format_screenshots(&screenshots, &dir, w)
            });
        }
        Commands::Screenshots {
            command: ScreenshotsCommands::Preview { index, dir },
        } => {
            let dir = config::resolve_screenshot_dir(&file_config, dir.as_deref());
            let screenshot = local::get_screenshots(&dir)?
                .into_iter()
                .nth(*index)
                .with_context(|| format!("No screenshot #{} found in {}", index, dir.display()))?;

            println!("{}", local::preview_for_path(&screenshot.path));
            return Ok(());
        }
        _ => {}
    }

    let screenshot_dir = match &cli.command {
        Commands::Screenshots {
            command: ScreenshotsCommands::Upload { dir, .. },
        } => dir.clone(),
        _ => None,
    };
    let preferences = Preferences::resolve(file_config, overrides(cli, screenshot_dir))?;
    let client = ZiplineClient::new(&preferences)?;
    let dispatcher = Dispatcher::new(&preferences, effects);

    match &cli.command {
        Commands::Upload {
            path,
            force_image,
            options,
        } => {
            let content = UploadContent::File {
                path: path.clone(),
                force_image: *force_image,
            };
            let options: UploadOptions = options.clone().into();
            let result = commands::upload(&client, &dispatcher, &content, &options).await?;

            emit(cli, &result, |w| output::upload_formatter::format_upload(&result, w))?;
        }
        Commands::Text { text, options } => {
            let content = UploadContent::Text(read_text_argument(text.clone())?);
            let options: UploadOptions = options.clone().into();
            let result = commands::upload(&client, &dispatcher, &content, &options).await?;

            emit(cli, &result, |w| output::upload_formatter::format_upload(&result, w))?;
        }
        Commands::Clipboard {
            force_image,
            options,
        } => {
            let options: UploadOptions = options.clone().into();
            let outcome =
                commands::upload_clipboard(&client, &dispatcher, *force_image, &options).await?;

            emit(cli, &outcome, |w| output::upload_formatter::format_quick(&outcome, w))?;
        }
        Commands::Shorten {
            url,
            vanity,
            password,
            max_views,
        } => {
            let options = ShortenUrlOptions {
                vanity: vanity.as_deref().map(str::trim).map(str::to_string),
                password: password.as_deref().map(str::trim).map(str::to_string),
                max_views: *max_views,
            };
            let destination = commands::shorten_destination(&dispatcher, url.as_deref())?;
            let result = commands::shorten(&client, &dispatcher, &destination, &options).await?;

            emit(cli, &result, |w| output::upload_formatter::format_shortened(&result, w))?;
        }
        Commands::Files { command } => match command {
            FilesCommands::List {
                page,
                per_page,
                preview,
            } => {
                let page = commands::browse_files(&client, *page, *per_page, *preview).await?;

                emit_paged(cli, &page, |w| {
                    output::file_formatter::format_files_page(&page, client.base_url(), w)
                })?;
            }
            FilesCommands::Delete { id, yes } => {
                if !confirm(&format!("Delete file \"{}\"?", id), *yes)? {
                    return Ok(());
                }

                api::files::delete_file(&client, id).await?;
                dispatcher.succeeded("File deleted");
            }
        },
        Commands::Urls { command } => match command {
            UrlsCommands::List => {
                let urls = api::urls::get_urls(&client).await?;

                emit_paged(cli, &urls, |w| {
                    output::url_formatter::format_urls_list(&urls, client.base_url(), w)
                })?;
            }
            UrlsCommands::Delete { id, yes } => {
                if !confirm(&format!("Delete short URL \"{}\"?", id), *yes)? {
                    return Ok(());
                }

                api::urls::delete_url(&client, id).await?;
                dispatcher.succeeded("URL deleted");
            }
        },
        Commands::Screenshots { command } => match command {
            ScreenshotsCommands::Upload { index, options, .. } => {
                let options: UploadOptions = options.clone().into();
                let result = commands::upload_screenshot(
                    &client,
                    &dispatcher,
                    &preferences.screenshot_dir,
                    *index,
                    &options,
                )
                .await?;

                emit(cli, &result, |w| output::upload_formatter::format_upload(&result, w))?;
            }
            ScreenshotsCommands::List { .. } | ScreenshotsCommands::Preview { .. } => {}
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let effects = SystemEffects::new(cli.no_color);

    match run(&cli, &effects).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            effects.notify(failure_notice(&e));
            ExitCode::FAILURE
        }
    }
}
