use std::path::{Path, PathBuf};

use crate::debrid::MemberFile;

/// Fixed fallback when the declared job name sanitizes away to nothing.
const DEFAULT_FOLDER_NAME: &str = "torrent";

/// Characters rejected by at least one mainstream filesystem.
const INVALID_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Pick the local relative path for the link at `index`.
///
/// Declared metadata wins when it has an entry at the same index (leading
/// separators stripped); otherwise the server-reported file name; a blank
/// result falls back to a 1-based placeholder so a metadata/link length
/// mismatch can never abort the item.
pub fn relative_path(index: usize, selected: &[&MemberFile], server_name: &str) -> String {
    let candidate = match selected.get(index) {
        Some(file) => file.path.trim_start_matches(['/', '\\']).to_string(),
        None => server_name.trim().to_string(),
    };

    if candidate.trim().is_empty() {
        format!("file-{}", index + 1)
    } else {
        candidate
    }
}

/// Align the path's extension with the name the server actually serves.
///
/// Remote metadata may list a file as `.mp3` while the service serves a
/// `.rar` of it; the served name is authoritative for the content type, the
/// declared path for directory placement.
pub fn reconcile_extension(relative: &str, server_name: &str) -> String {
    let server_ext = Path::new(server_name)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned());
    let Some(server_ext) = server_ext.filter(|ext| !ext.is_empty()) else {
        return relative.to_string();
    };

    let declared_ext = Path::new(relative)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();
    if declared_ext.eq_ignore_ascii_case(&server_ext) {
        relative.to_string()
    } else {
        Path::new(relative)
            .with_extension(server_ext)
            .to_string_lossy()
            .into_owned()
    }
}

/// Full destination path for the link at `index` under `root`.
pub fn destination(root: &Path, index: usize, selected: &[&MemberFile], server_name: &str) -> PathBuf {
    let relative = relative_path(index, selected, server_name);
    root.join(reconcile_extension(&relative, server_name))
}

/// Strip characters the local filesystem rejects in file or folder names.
pub fn safe_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return DEFAULT_FOLDER_NAME.to_string();
    }

    let replaced: String = trimmed
        .chars()
        .map(|c| {
            if INVALID_NAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if replaced.trim().is_empty() {
        DEFAULT_FOLDER_NAME.to_string()
    } else {
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(path: &str) -> MemberFile {
        MemberFile {
            path: path.to_string(),
            selected: 1,
        }
    }

    #[test]
    fn declared_path_wins_and_loses_leading_separators() {
        let files = [member("/album/01 - intro.mp3")];
        let selected: Vec<&MemberFile> = files.iter().collect();
        assert_eq!(
            relative_path(0, &selected, "served.mp3"),
            "album/01 - intro.mp3"
        );
    }

    #[test]
    fn server_name_fills_in_for_missing_declared_entries() {
        let files = [member("/album/01.mp3")];
        let selected: Vec<&MemberFile> = files.iter().collect();
        assert_eq!(relative_path(1, &selected, "bonus.flac"), "bonus.flac");
    }

    #[test]
    fn placeholder_names_are_one_based() {
        let selected: Vec<&MemberFile> = Vec::new();
        assert_eq!(relative_path(0, &selected, ""), "file-1");
        assert_eq!(relative_path(1, &selected, ""), "file-2");
        assert_eq!(relative_path(2, &selected, "  "), "file-3");
    }

    #[test]
    fn server_extension_replaces_a_diverging_declared_one() {
        assert_eq!(reconcile_extension("track.mp3", "track.rar"), "track.rar");
        assert_eq!(
            reconcile_extension("album/track.mp3", "served.rar"),
            "album/track.rar"
        );
    }

    #[test]
    fn matching_extensions_are_left_alone() {
        assert_eq!(reconcile_extension("track.mp3", "track.mp3"), "track.mp3");
        assert_eq!(reconcile_extension("track.MP3", "other.mp3"), "track.MP3");
    }

    #[test]
    fn missing_server_extension_changes_nothing() {
        assert_eq!(reconcile_extension("track.mp3", ""), "track.mp3");
        assert_eq!(reconcile_extension("track.mp3", "README"), "track.mp3");
    }

    #[test]
    fn extension_is_added_when_the_declared_path_has_none() {
        assert_eq!(reconcile_extension("file-1", "served.zip"), "file-1.zip");
    }

    #[test]
    fn destination_combines_path_choice_and_extension() {
        let files = [member("/album/01 - intro.mp3")];
        let selected: Vec<&MemberFile> = files.iter().collect();
        let dest = destination(Path::new("/out"), 0, &selected, "payload.rar");
        assert_eq!(dest, Path::new("/out/album/01 - intro.rar"));
    }

    #[test]
    fn invalid_characters_become_underscores() {
        assert_eq!(safe_name("My:Torrent*Name"), "My_Torrent_Name");
        assert_eq!(safe_name("a/b\\c"), "a_b_c");
        assert_eq!(safe_name("ok name"), "ok name");
    }

    #[test]
    fn blank_names_fall_back_to_the_default() {
        assert_eq!(safe_name(""), "torrent");
        assert_eq!(safe_name("   "), "torrent");
    }
}
