//! Decomposition collaborator.
//!
//! The engine does not implement Unicode normalization itself; it delegates
//! to ICU4X. Canonical decomposition is NFD, full decomposition is NFKD.

use std::borrow::Cow;
use std::sync::LazyLock;

use icu_normalizer::{DecomposingNormalizer, DecomposingNormalizerBorrowed};

static NFD: LazyLock<DecomposingNormalizerBorrowed<'static>> =
    LazyLock::new(DecomposingNormalizer::new_nfd);
static NFKD: LazyLock<DecomposingNormalizerBorrowed<'static>> =
    LazyLock::new(DecomposingNormalizer::new_nfkd);

/// Pre-tokenization normalization mode of a collator.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Decomposition {
    /// Text is collated exactly as handed in.
    None,
    /// Canonical decomposition (NFD). The default.
    #[default]
    Canonical,
    /// Compatibility decomposition (NFKD).
    Full,
}

/// Decompose `text` according to `mode`, borrowing when already normalized.
pub fn decompose(text: &str, mode: Decomposition) -> Cow<'_, str> {
    match mode {
        Decomposition::None => Cow::Borrowed(text),
        Decomposition::Canonical => NFD.normalize(text),
        Decomposition::Full => NFKD.normalize(text),
    }
}

/// Canonical decomposition used for rule text, independent of any collator
/// configuration.
pub(crate) fn decompose_rules(text: &str) -> Cow<'_, str> {
    decompose(text, Decomposition::Canonical)
}
