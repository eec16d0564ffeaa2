/// Longest file name kept after sanitizing, in characters.
pub const MAX_FILENAME_LEN: usize = 255;

const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strips characters that are invalid in file names on common file systems
/// and truncates to [`MAX_FILENAME_LEN`] characters.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .take(MAX_FILENAME_LEN)
        .collect()
}
