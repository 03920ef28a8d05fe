use unicode_linebreak::linebreaks;

/// Source of potential line break positions for text in one language.
///
/// Implementations see the whole paragraph text so that break rules can look
/// at context on both sides of a language boundary.
pub trait LineBreaker {
    /// Potential break offsets strictly greater than `offset`, in increasing
    /// order. The sequence is finite and may include `text.len()`.
    fn following<'a>(
        &'a self,
        text: &'a str,
        offset: usize,
    ) -> Box<dyn Iterator<Item = usize> + 'a>;
}

/// Line breaker following the Unicode line breaking algorithm (UAX #14).
#[derive(Debug, Clone, Copy, Default)]
pub struct UaxLineBreaker;

impl LineBreaker for UaxLineBreaker {
    fn following<'a>(
        &'a self,
        text: &'a str,
        offset: usize,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(
            linebreaks(text)
                .map(|(pos, _)| pos)
                .filter(move |&pos| pos > offset),
        )
    }
}

/// Line breaker that reports a fixed, caller-supplied set of offsets.
#[derive(Debug, Clone, Default)]
pub struct FixedBreaks {
    offsets: Vec<usize>,
}

impl FixedBreaks {
    pub fn new(mut offsets: Vec<usize>) -> Self {
        offsets.sort_unstable();
        offsets.dedup();
        Self { offsets }
    }
}

impl LineBreaker for FixedBreaks {
    fn following<'a>(
        &'a self,
        text: &'a str,
        offset: usize,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        let len = text.len();
        Box::new(
            self.offsets
                .iter()
                .copied()
                .filter(move |&pos| pos > offset && pos <= len),
        )
    }
}
