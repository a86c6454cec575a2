use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(#[from] arboard::Error);

/// Reads the system clipboard as a single line of text.
///
/// Line breaks are folded into spaces since every form field is edited on one line.
pub fn paste_text() -> Result<String, ClipboardError> {
    let text = Clipboard::new()?.get_text()?;
    Ok(single_line(&text))
}

pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_folds_breaks() {
        assert_eq!(single_line("Fleet review\r\nfor 40 vans\n\n"), "Fleet review for 40 vans");
        assert_eq!(single_line("plain"), "plain");
        assert_eq!(single_line(""), "");
    }
}
