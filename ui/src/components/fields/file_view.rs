//! File preview keyed by file category
//!
//! Renders a served or locally picked file: inline image, audio/video
//! player, or a download link for binary and unknown content.

use leptos::prelude::*;

use crate::types::FileType;

/// Human-readable name of a served file, decoded from the URL's last path
/// segment. Object URLs have opaque paths; those fall back to the category
/// label.
pub fn filename_from_url(url: &str, filetype: FileType) -> String {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    if segment.is_empty() || trimmed.starts_with("blob:") {
        return filetype.label().to_string();
    }
    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

/// Read-only preview of one file value.
#[component]
pub fn FileView(url: String, filetype: FileType) -> impl IntoView {
    match filetype {
        FileType::Image => view! {
            <img
                src=url
                alt="image output"
                class="max-w-full max-h-96 rounded border border-gray-200"
                loading="lazy"
            />
        }
        .into_any(),
        FileType::Audio => view! {
            <audio controls src=url class="w-full"></audio>
        }
        .into_any(),
        FileType::Video => view! {
            <video controls src=url class="max-w-full max-h-96 rounded border border-gray-200"></video>
        }
        .into_any(),
        FileType::Binary => {
            let name = filename_from_url(&url, filetype);
            view! {
                <a
                    href=url
                    download
                    class="inline-flex items-center gap-2 px-3 py-2 text-sm border border-gray-300 rounded-md hover:bg-gray-50"
                >
                    <span class="text-gray-400">"\u{2913}"</span>
                    <span class="font-mono">{name}</span>
                </a>
            }
            .into_any()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("/files/out.png", FileType::Image),
            "out.png"
        );
        assert_eq!(
            filename_from_url("http://localhost:3300/files/a%20b.wav", FileType::Audio),
            "a b.wav"
        );
        assert_eq!(
            filename_from_url("/files/report.bin?token=x", FileType::Binary),
            "report.bin"
        );
    }

    #[test]
    fn test_filename_falls_back_to_category() {
        assert_eq!(filename_from_url("", FileType::Binary), "file");
        assert_eq!(
            filename_from_url("blob:http://localhost/1234", FileType::Video),
            "video"
        );
    }
}
