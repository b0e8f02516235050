use crate::query::Page;

/// Returns the lines of `text` inside `page`, joined back with `\n`.
///
/// Lines are split on every `\n` with no grouping of blank lines, so a window
/// past the end yields an empty string.
pub fn page_lines(text: &str, page: Page) -> String {
    text.split('\n')
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect::<Vec<_>>()
        .join("\n")
}
