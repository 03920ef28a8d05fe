//! Specimen text files: UTF-8 paragraphs separated by blank lines.

/// Split `text` into paragraphs. Lines inside a paragraph are kept joined
/// by line feeds; blank or whitespace-only lines separate paragraphs.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}
