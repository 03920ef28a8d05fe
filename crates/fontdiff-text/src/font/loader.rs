use std::path::Path;
use std::sync::Arc;

use crate::font::{Font, FontCollection, FontError, FontFace, FontHandle, Result};
use crate::style::Style;

#[derive(Debug, Clone)]
struct Entry {
    face: Arc<FontFace>,
    weight: u16,
}

/// Ordered set of font faces loaded from files.
///
/// Files are read through `fontdb`, so collections (`.ttc`/`.otc`) contribute
/// every face they contain. Lookup order is load order.
#[derive(Debug, Default, Clone)]
pub struct FontSet {
    entries: Vec<Entry>,
}

impl FontSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every face of every file in `paths`.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut set = Self::new();
        for path in paths {
            set.load_file(path.as_ref())?;
        }
        Ok(set)
    }

    /// Load all faces from one font file and append them to the set.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let mut db = fontdb::Database::new();
        db.load_font_file(path)?;

        let infos: Vec<_> = db
            .faces()
            .map(|info| (info.id, info.post_script_name.clone(), info.weight.0))
            .collect();
        if infos.is_empty() {
            return Err(FontError::NoFaces(path.to_path_buf()));
        }

        for (id, name, weight) in infos {
            let face = db
                .with_face_data(id, |data, index| {
                    FontFace::from_bytes(name.as_str(), Arc::from(data), index)
                })
                .ok_or(FontError::InvalidFont)??;
            log::debug!(
                "loaded font face {} (weight {weight}) from {}",
                face.name(),
                path.display()
            );
            self.push(Arc::new(face), weight);
        }
        Ok(())
    }

    /// Append an already loaded face.
    pub fn push(&mut self, face: Arc<FontFace>, weight: u16) {
        self.entries.push(Entry { face, weight });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FontCollection for FontSet {
    fn find_font(
        &self,
        ch: char,
        style: &Style,
        previous: Option<&FontHandle>,
    ) -> Option<FontHandle> {
        if let Some(previous) = previous {
            if previous.covers(ch) {
                return Some(previous.clone());
            }
        }

        self.entries
            .iter()
            .filter(|entry| entry.face.covers(ch))
            .min_by_key(|entry| entry.weight.abs_diff(style.weight))
            .map(|entry| entry.face.clone() as FontHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_finds_nothing() {
        let set = FontSet::new();
        assert!(set.is_empty());
        assert!(set.find_font('a', &Style::default(), None).is_none());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FontSet::load(&["/nonexistent/font.ttf"]).unwrap_err();
        assert!(matches!(err, FontError::Io(_)));
    }
}
