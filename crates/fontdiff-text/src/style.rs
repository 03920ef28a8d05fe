//! Text styles and languages attached to paragraph spans.

use core::fmt;
use std::sync::Arc;

use crate::layout::{LineBreaker, UaxLineBreaker};

/// A language tag together with the line breaker used for its text.
#[derive(Clone)]
pub struct Language {
    tag: String,
    breaker: Option<Arc<dyn LineBreaker>>,
}

impl Language {
    /// Language using the default UAX #14 line breaker.
    pub fn new(tag: impl Into<String>) -> Self {
        Self::with_breaker(tag, Arc::new(UaxLineBreaker))
    }

    /// Language with an explicit line breaker.
    pub fn with_breaker(tag: impl Into<String>, breaker: Arc<dyn LineBreaker>) -> Self {
        Self {
            tag: tag.into(),
            breaker: Some(breaker),
        }
    }

    /// Language for which no break opportunities are known; text in this
    /// language is never broken softly.
    pub fn without_breaker(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            breaker: None,
        }
    }

    /// BCP 47 tag, e.g. `en` or `sr-Latn`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn line_breaker(&self) -> Option<&dyn LineBreaker> {
        self.breaker.as_deref()
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("tag", &self.tag)
            .field("has_breaker", &self.breaker.is_some())
            .finish()
    }
}

/// An OpenType feature setting such as `liga=0` or `ss01=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFeature {
    pub tag: [u8; 4],
    pub value: u32,
}

impl FontFeature {
    pub fn new(tag: &[u8; 4], value: u32) -> Self {
        Self { tag: *tag, value }
    }
}

/// Style of a span of paragraph text.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Font size in pixels per em.
    pub font_size: f32,
    /// CSS-style weight (100..=900) used to pick among fonts covering a
    /// character.
    pub weight: u16,
    pub language: Option<Language>,
    pub features: Vec<FontFeature>,
}

impl Style {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            weight: 400,
            language: None,
            features: Vec::new(),
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_feature(mut self, feature: FontFeature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(16.0)
    }
}
