//! Small shared helpers for time display and URI handling

use std::path::PathBuf;

const FILE_SCHEME: &str = "file://";

/// Format a position in milliseconds as `HH:MM:SS`
///
/// Hours are not wrapped; minutes and seconds are. Negative input formats as
/// zero.
///
/// ```rust
/// use reprise_core::util::format_time;
///
/// assert_eq!(format_time(65_000), "00:01:05");
/// assert_eq!(format_time(90_061_999), "25:01:01");
/// ```
pub fn format_time(milliseconds: i64) -> String {
    let total_seconds = milliseconds.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Display name for a URI: the percent-decoded text after the last `/`
///
/// ```rust
/// use reprise_core::util::uri_display_name;
///
/// assert_eq!(uri_display_name("/music/Some%20Album/01%20Intro.mp3"), "01 Intro.mp3");
/// assert_eq!(uri_display_name("plain.mp3"), "plain.mp3");
/// ```
pub fn uri_display_name(uri: &str) -> String {
    let decoded = urlencoding::decode(uri)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| uri.to_string());

    match decoded.rfind('/') {
        Some(index) => decoded[index + 1..].to_string(),
        None => decoded,
    }
}

/// Local file system path for a URI, stripping a `file://` scheme
pub fn uri_to_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_time_pads_each_part() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(999), "00:00:00");
        assert_eq!(format_time(3_723_000), "01:02:03");
        assert_eq!(format_time(-5), "00:00:00");
    }

    #[test]
    fn format_time_does_not_wrap_hours() {
        assert_eq!(format_time(100 * 3_600_000), "100:00:00");
    }

    #[test]
    fn display_name_decodes_content_uris() {
        assert_eq!(
            uri_display_name("content://media/external/audio%2Fmedia%2FTrack%201.mp3"),
            "Track 1.mp3"
        );
    }

    #[test]
    fn display_name_of_trailing_slash_is_empty() {
        assert_eq!(uri_display_name("/music/"), "");
    }

    #[test]
    fn uri_to_path_strips_file_scheme() {
        assert_eq!(uri_to_path("file:///tmp/a.mp3"), PathBuf::from("/tmp/a.mp3"));
        assert_eq!(uri_to_path("/tmp/a.mp3"), PathBuf::from("/tmp/a.mp3"));
    }
}
