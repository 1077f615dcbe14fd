//! Output renderers and the terminal presenter.

use anyhow::anyhow;
use serde::Serialize;
use skucheck_app::{Advisory, FatalNotice, Presenter, SearchPhase};
use skucheck_core::links::{
    DEFAULT_THUMBNAIL_SIZE, extract_file_id, file_view_url, folder_url, thumbnail_url,
};
use skucheck_core::{BadgeTone, FieldValue, RemoteFile, SearchResult, StatusField, classify_status};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

#[derive(Serialize)]
struct BadgeView<'a> {
    field: StatusField,
    value: Option<&'a str>,
    tone: BadgeTone,
}

#[derive(Serialize)]
struct ResultView<'a> {
    #[serde(flatten)]
    result: &'a SearchResult,
    badges: Vec<BadgeView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folder_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    front_thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    back_thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    thumbnails: Vec<ThumbnailView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    estimated_photo_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advisory: Option<Advisory>,
}

#[derive(Serialize)]
struct ThumbnailView<'a> {
    id: &'a str,
    url: String,
}

/// Thumbnail for an expected photo id, which may be pasted as a share link.
fn expected_thumbnail(file_id: Option<&str>) -> Option<String> {
    let id = file_id.and_then(extract_file_id)?;
    thumbnail_url(&id, DEFAULT_THUMBNAIL_SIZE)
}

/// Listing-provided thumbnail, else one built from the file id.
fn file_thumbnail(file: &RemoteFile) -> Option<String> {
    file.thumbnail_link
        .clone()
        .filter(|link| !link.is_empty())
        .or_else(|| thumbnail_url(&file.id, DEFAULT_THUMBNAIL_SIZE))
}

fn thumbnails(files: &[RemoteFile]) -> Vec<ThumbnailView<'_>> {
    files
        .iter()
        .filter_map(|file| {
            file_thumbnail(file).map(|url| ThumbnailView {
                id: file.id.as_str(),
                url,
            })
        })
        .collect()
}

/// Photo count reported by the record store, shown when no listing exists.
fn estimated_photo_count(result: &SearchResult) -> Option<String> {
    if result.degradation().is_none() {
        return None;
    }
    result
        .record()
        .fields
        .raw_photo_count
        .as_ref()
        .map(ToString::to_string)
}

fn badges(result: &SearchResult) -> Vec<BadgeView<'_>> {
    StatusField::ALL
        .into_iter()
        .map(|field| {
            let value = result.record().status(field);
            BadgeView {
                field,
                value,
                tone: classify_status(value, field),
            }
        })
        .collect()
}

fn to_json(value: &impl Serialize) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn format_result(result: &SearchResult, format: OutputFormat) -> CliResult<String> {
    let advisory = result.degradation().map(Advisory::from_degradation);
    let folder_link = result.folder().and_then(folder_url);
    let front_thumbnail = expected_thumbnail(result.record().front_file_id());
    let back_thumbnail = expected_thumbnail(result.record().back_file_id());
    let estimated = estimated_photo_count(result);
    match format {
        OutputFormat::Json => to_json(&ResultView {
            result,
            badges: badges(result),
            folder_link,
            front_thumbnail,
            back_thumbnail,
            thumbnails: result.files().map(thumbnails).unwrap_or_default(),
            estimated_photo_count: estimated,
            advisory,
        }),
        OutputFormat::Table => {
            let mut lines = Vec::new();
            lines.push(format!("sku: {} (record {})", result.sku(), result.record().id));

            let badge_line = badges(result)
                .iter()
                .map(|badge| {
                    format!(
                        "{} [{}] {}",
                        badge.field.label(),
                        badge.tone.as_str(),
                        badge.value.unwrap_or("-")
                    )
                })
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(format!("status: {badge_line}"));

            let fields = &result.record().fields;
            let metadata: [(&str, Option<&FieldValue>); 9] = [
                ("brand", fields.brand.as_ref()),
                ("category", fields.category.as_ref()),
                ("sub-category", fields.sub_category.as_ref()),
                ("gender", fields.gender.as_ref()),
                ("size", fields.size.as_ref()),
                ("colors", fields.colors.as_ref()),
                ("condition", fields.condition.as_ref()),
                ("notes", fields.notes.as_ref()),
                ("photo count", fields.raw_photo_count.as_ref()),
            ];
            for (label, value) in metadata {
                if let Some(value) = value {
                    lines.push(format!("{label}: {value}"));
                }
            }

            match (result.folder(), folder_link) {
                (Some(folder), Some(link)) => lines.push(format!("folder: {folder} {link}")),
                (Some(folder), None) => lines.push(format!("folder: {folder}")),
                (None, _) => lines.push("folder: -".to_string()),
            }
            lines.push(format_expected(
                "front",
                result.front().as_str(),
                result.record().front_file_id(),
                front_thumbnail.as_deref(),
            ));
            lines.push(format_expected(
                "back",
                result.back().as_str(),
                result.record().back_file_id(),
                back_thumbnail.as_deref(),
            ));

            if let Some(files) = result.files() {
                lines.push(format!("photos: {}", files.len()));
                lines.extend(files.iter().map(format_file));
            } else if let Some(count) = estimated {
                lines.push(format!("photos: ~{count} (estimated)"));
            }
            if let Some(advisory) = advisory {
                lines.push(format!("note: {}", advisory.message));
            }
            Ok(lines.join("\n"))
        }
    }
}

fn format_expected(
    side: &str,
    verdict: &str,
    file_id: Option<&str>,
    thumbnail: Option<&str>,
) -> String {
    let line = format!("{side}: {verdict} ({})", file_id.unwrap_or("-"));
    match thumbnail {
        Some(link) => format!("{line} {link}"),
        None => line,
    }
}

fn format_file(file: &RemoteFile) -> String {
    let size = file.size.map_or_else(|| "-".to_string(), format_bytes);
    let link = file_view_url(&file.id).unwrap_or_default();
    format!("  {:<24} {:>10}  {} {}", file.name, size, file.id, link)
}

pub(crate) fn format_notice(notice: &FatalNotice, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(notice),
        OutputFormat::Table => Ok(format!("{}: {}", notice.title, notice.message)),
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024 && unit < UNITS.len() - 1 {
        value /= 1024;
        unit += 1;
    }
    format!("{value} {}", UNITS[unit])
}

/// Presenter writing current results to stdout and notices to stderr.
pub(crate) struct TerminalPresenter {
    format: OutputFormat,
}

impl TerminalPresenter {
    pub(crate) const fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Presenter for TerminalPresenter {
    fn render(&self, result: &SearchResult) {
        match format_result(result, self.format) {
            Ok(text) => println!("{text}"),
            Err(err) => tracing::warn!(error = %err.display_message(), "failed to render result"),
        }
    }

    fn render_error(&self, notice: &FatalNotice) {
        match format_notice(notice, self.format) {
            Ok(text) => eprintln!("{text}"),
            Err(err) => tracing::warn!(error = %err.display_message(), "failed to render notice"),
        }
    }

    fn advise(&self, advisory: &Advisory) {
        tracing::debug!(message = %advisory.message, "result degraded");
    }

    fn phase_changed(&self, phase: SearchPhase) {
        tracing::debug!(phase = phase.as_str(), "search phase");
    }
}
