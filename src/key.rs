//! Binary sort keys.
//!
//! A key concatenates the weight levels of a string: fixed-width big-endian
//! primaries, a two-byte separator, one-byte secondaries, a one-byte
//! separator, one-byte tertiaries, and (at identical strength) the
//! normalized code points. Weights of zero are filtered at each level, the
//! same way the comparator skips them, so unsigned byte comparison of two
//! keys always agrees in sign with `compare` at the same configuration.
//! Separator bytes sort below every live weight because weights at a level
//! are never zero once filtered.

use std::cmp::Ordering;

use crate::config::{CollatorConfig, Strength};
use crate::element::{primary_order, secondary_order, tertiary_order};

/// A string's collation key: directly byte-comparable, deterministic for a
/// fixed collator configuration.
#[derive(Debug, Clone)]
pub struct CollationKey {
    source: String,
    bytes: Vec<u8>,
}

impl CollationKey {
    pub(crate) fn encode(
        source: &str,
        elements: &[i32],
        normalized: &str,
        config: CollatorConfig,
    ) -> Self {
        let mut bytes = Vec::with_capacity(elements.len() * 4);

        for &e in elements {
            let p = primary_order(e);
            if p != 0 {
                bytes.extend_from_slice(&p.to_be_bytes());
            }
        }
        bytes.extend_from_slice(&[0, 0]);

        if config.strength >= Strength::Secondary {
            let secondaries = elements
                .iter()
                .map(|&e| secondary_order(e))
                .filter(|&s| s != 0);
            if config.french_secondary {
                let mut level: Vec<u8> = secondaries.collect();
                level.reverse();
                bytes.extend_from_slice(&level);
            } else {
                bytes.extend(secondaries);
            }
            bytes.push(0);
        }

        if config.strength >= Strength::Tertiary {
            bytes.extend(elements.iter().map(|&e| tertiary_order(e)).filter(|&t| t != 0));
        }

        if config.strength == Strength::Identical {
            bytes.push(0);
            for c in normalized.chars() {
                let cp = c as u32;
                bytes.extend_from_slice(&[(cp >> 16) as u8, (cp >> 8) as u8, cp as u8]);
            }
        }

        CollationKey {
            source: source.to_owned(),
            bytes,
        }
    }

    /// The string the key was generated from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

// Ordering considers the key bytes only; two keys for different source
// strings may compare equal (that is the point).
impl PartialEq for CollationKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for CollationKey {}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Decomposition, RuleBasedCollator, Strength};
    use std::cmp::Ordering;

    #[test]
    fn key_order_matches_compare() {
        let col = RuleBasedCollator::new("< a < b < c < ch").unwrap();
        let samples = ["", "a", "b", "ab", "ba", "ch", "cch", "chb", "hc"];
        for x in samples {
            for y in samples {
                let by_compare = col.compare(x, y);
                let by_key = col.collation_key(x).cmp(&col.collation_key(y));
                assert_eq!(by_compare, by_key, "disagree on {x:?} vs {y:?}");
            }
        }
    }

    #[test]
    fn secondary_only_ignorables_keep_keys_and_compare_in_agreement() {
        // entries tailored before any `<` have a zero primary but live
        // secondary weights; they must filter identically on both paths
        let samples = ["", "x", "y", "xy", "yx", "a", "xa", "ax", "ayb", "bxa", "ab"];
        for french in [false, true] {
            let mut col = RuleBasedCollator::new("; x ; y < a < b").unwrap();
            col.set_french_secondary(french);
            for strength in [
                Strength::Primary,
                Strength::Secondary,
                Strength::Tertiary,
                Strength::Identical,
            ] {
                col.set_strength(strength);
                for s in samples {
                    for t in samples {
                        assert_eq!(
                            col.compare(s, t),
                            col.collation_key(s).cmp(&col.collation_key(t)),
                            "disagree on {s:?} vs {t:?} at {strength:?}, french={french}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn keys_are_deterministic() {
        let col = RuleBasedCollator::new("< a < b").unwrap();
        assert_eq!(
            col.collation_key("abba").as_bytes(),
            col.collation_key("abba").as_bytes()
        );
    }

    #[test]
    fn equal_keys_only_when_compare_says_equal() {
        let mut col = RuleBasedCollator::new("< a, A < b").unwrap();
        col.set_strength(Strength::Primary);
        // primary-only: case is invisible
        assert_eq!(col.compare("aA", "Aa"), Ordering::Equal);
        assert_eq!(col.collation_key("aA"), col.collation_key("Aa"));

        col.set_strength(Strength::Tertiary);
        assert_ne!(col.compare("aA", "Aa"), Ordering::Equal);
        assert_ne!(col.collation_key("aA"), col.collation_key("Aa"));
    }

    #[test]
    fn identical_level_appends_code_points() {
        let mut col = RuleBasedCollator::new("< a < b").unwrap();
        col.set_strength(Strength::Identical);
        col.set_decomposition(Decomposition::None);
        let composed = col.collation_key("\u{00e4}");
        let decomposed = col.collation_key("a\u{0308}");
        assert_ne!(composed, decomposed);
        assert_eq!(
            composed.cmp(&decomposed),
            col.compare("\u{00e4}", "a\u{0308}")
        );
    }

    #[test]
    fn source_text_is_retained() {
        let col = RuleBasedCollator::new("< a").unwrap();
        assert_eq!(col.collation_key("abc").source(), "abc");
    }

    #[test]
    fn french_secondary_reverses_the_secondary_level() {
        let mut col = RuleBasedCollator::new("< a ; b < c").unwrap();
        let plain = col.collation_key("ab").to_bytes();
        col.set_french_secondary(true);
        let french = col.collation_key("ab").to_bytes();
        assert_ne!(plain, french);
    }
}
