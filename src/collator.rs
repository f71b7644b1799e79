//! The rule-based collator: an immutable weight table bound to a small
//! mutable configuration, plus the multi-pass string comparator.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::{CollatorConfig, Strength};
use crate::element::{NULLORDER, is_ignorable, primary_order, secondary_order, tertiary_order};
use crate::iter::CollationElementIterator;
use crate::key::CollationKey;
use crate::normalize::{Decomposition, decompose};
use crate::rules::{ParseError, RuleSet};
use crate::table::CollationTable;

/// Locale-tailorable string comparator built from tailoring rules.
///
/// The weight table is built once and shared; `Clone` copies only the
/// configuration. A collator is cheap to clone and safe to share read-only,
/// but iterators derived from it each carry their own mutable cursor.
#[derive(Debug, Clone)]
pub struct RuleBasedCollator {
    table: Arc<CollationTable>,
    config: CollatorConfig,
}

impl RuleBasedCollator {
    /// Build a collator from a tailoring-rule string.
    ///
    /// Any grammar failure aborts construction; there is no partially
    /// usable table.
    pub fn new(rules: &str) -> Result<Self, ParseError> {
        Self::from_rule_set(RuleSet::parse(rules)?)
    }

    /// Build a collator whose rules extend an existing collator's rules.
    /// `&` anchors in `rules` may address any entry of the base table.
    pub fn with_base(base: &RuleBasedCollator, rules: &str) -> Result<Self, ParseError> {
        let mut set = base.table.rule_set().clone();
        set.add_rules(rules)?;
        Self::from_rule_set(set)
    }

    fn from_rule_set(set: RuleSet) -> Result<Self, ParseError> {
        let french_secondary = set.is_french();
        let table = CollationTable::build(set)?;
        Ok(RuleBasedCollator {
            table: Arc::new(table),
            config: CollatorConfig {
                french_secondary,
                ..CollatorConfig::default()
            },
        })
    }

    /// Regenerate rule text that parses back to an equivalent collator.
    pub fn rules(&self) -> String {
        self.table.rule_set().to_rules()
    }

    pub fn strength(&self) -> Strength {
        self.config.strength
    }

    pub fn set_strength(&mut self, strength: Strength) {
        self.config.strength = strength;
    }

    pub fn decomposition(&self) -> Decomposition {
        self.config.decomposition
    }

    pub fn set_decomposition(&mut self, decomposition: Decomposition) {
        self.config.decomposition = decomposition;
    }

    pub fn french_secondary(&self) -> bool {
        self.config.french_secondary
    }

    pub fn set_french_secondary(&mut self, french: bool) {
        self.config.french_secondary = french;
    }

    pub(crate) fn config(&self) -> CollatorConfig {
        self.config
    }

    /// Bind an element iterator to `text`, snapshotting the current
    /// configuration.
    pub fn collation_element_iterator(&self, text: &str) -> CollationElementIterator {
        CollationElementIterator::bind(Arc::clone(&self.table), self.config, text)
    }

    /// Compare two strings at the configured strength.
    ///
    /// One pass per level: primaries first, then secondaries (end-to-start
    /// when French ordering is on), then tertiaries, and at identical
    /// strength a final code-point comparison of the normalized text.
    /// Weights that are zero at a level are skipped, so ignorables never
    /// decide a comparison.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let ea = self.elements_of(a);
        let eb = self.elements_of(b);

        let primaries =
            |e: &[i32]| e.iter().map(|&e| primary_order(e)).filter(|&p| p != 0).collect::<Vec<_>>();
        match primaries(&ea).cmp(&primaries(&eb)) {
            Ordering::Equal => {}
            unequal => return unequal,
        }

        if self.config.strength >= Strength::Secondary {
            let secondaries = |e: &[i32]| {
                e.iter().map(|&e| secondary_order(e)).filter(|&s| s != 0).collect::<Vec<_>>()
            };
            let mut sa = secondaries(&ea);
            let mut sb = secondaries(&eb);
            if self.config.french_secondary {
                sa.reverse();
                sb.reverse();
            }
            match sa.cmp(&sb) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        if self.config.strength >= Strength::Tertiary {
            let tertiaries = |e: &[i32]| {
                e.iter().map(|&e| tertiary_order(e)).filter(|&t| t != 0).collect::<Vec<_>>()
            };
            match tertiaries(&ea).cmp(&tertiaries(&eb)) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }

        if self.config.strength == Strength::Identical {
            let na = decompose(a, self.config.decomposition);
            let nb = decompose(b, self.config.decomposition);
            return na.chars().cmp(nb.chars());
        }

        Ordering::Equal
    }

    /// `compare(a, b) == Equal`.
    pub fn equals(&self, a: &str, b: &str) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    /// Sort key whose byte order agrees with [`compare`](Self::compare) at
    /// the current configuration.
    pub fn collation_key(&self, text: &str) -> CollationKey {
        let elements = self.elements_of(text);
        let normalized = decompose(text, self.config.decomposition);
        CollationKey::encode(text, &elements, &normalized, self.config)
    }

    fn elements_of(&self, text: &str) -> Vec<i32> {
        let mut iter = self.collation_element_iterator(text);
        let mut out = Vec::with_capacity(text.len());
        loop {
            let e = iter.next();
            if e == NULLORDER {
                return out;
            }
            // completely ignorable elements contribute nothing at any level
            if !is_ignorable(e) {
                out.push(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_difference_decides_early() {
        let col = RuleBasedCollator::new("< a < b").unwrap();
        assert_eq!(col.compare("a", "bb"), Ordering::Less);
        assert_eq!(col.compare("bb", "a"), Ordering::Greater);
        assert_eq!(col.compare("ab", "ab"), Ordering::Equal);
    }

    #[test]
    fn shorter_prefix_orders_first() {
        let col = RuleBasedCollator::new("< a < b").unwrap();
        assert_eq!(col.compare("a", "ab"), Ordering::Less);
        assert_eq!(col.compare("ab", "a"), Ordering::Greater);
    }

    #[test]
    fn strength_limits_what_counts() {
        let mut col = RuleBasedCollator::new("< a, A < d; D").unwrap();
        assert_eq!(col.compare("a", "A"), Ordering::Less); // tertiary difference

        col.set_strength(Strength::Secondary);
        assert!(col.equals("a", "A")); // case masked out
        assert_eq!(col.compare("d", "D"), Ordering::Less); // secondary survives

        col.set_strength(Strength::Primary);
        assert!(col.equals("d", "D"));
        assert_eq!(col.compare("a", "d"), Ordering::Less);
    }

    #[test]
    fn config_changes_never_touch_the_shared_table() {
        let mut col = RuleBasedCollator::new("< a < b").unwrap();
        let clone = col.clone();
        col.set_strength(Strength::Primary);
        col.set_decomposition(Decomposition::None);
        // the clone keeps its own config but shares the table
        assert_eq!(clone.strength(), Strength::Tertiary);
        assert_eq!(clone.compare("a", "b"), Ordering::Less);
        assert_eq!(col.compare("a", "b"), Ordering::Less);
    }

    #[test]
    fn french_secondary_walks_accents_from_the_end() {
        // two "accents" x and y at the secondary level
        let mut col = RuleBasedCollator::new("< a ; x ; y < b").unwrap();
        assert_eq!(col.compare("axay", "ayax"), Ordering::Less);
        col.set_french_secondary(true);
        assert_eq!(col.compare("axay", "ayax"), Ordering::Greater);
    }

    #[test]
    fn tertiary_pass_stays_forward_under_french() {
        let mut col = RuleBasedCollator::new("< a, A < b").unwrap();
        col.set_french_secondary(true);
        assert_eq!(col.compare("aA", "Aa"), Ordering::Less);
    }

    #[test]
    fn identical_strength_separates_canonical_equivalents_without_decomposition() {
        let mut col = RuleBasedCollator::new("< a < b").unwrap();
        col.set_strength(Strength::Identical);

        // canonical decomposition makes them the same text
        assert!(col.equals("\u{00e4}", "a\u{0308}"));

        col.set_decomposition(Decomposition::None);
        assert_ne!(col.compare("\u{00e4}", "a\u{0308}"), Ordering::Equal);
    }

    #[test]
    fn ignorable_entries_never_decide() {
        let col = RuleBasedCollator::new("= x < a < b").unwrap();
        assert!(col.equals("axb", "ab"));
        assert!(col.equals("x", ""));
        assert_eq!(col.compare("axa", "ab"), Ordering::Less);
    }

    #[test]
    fn extending_a_base_collator_keeps_its_entries() {
        let base = RuleBasedCollator::new("< a < b, c/a < d < z").unwrap();
        let extended = RuleBasedCollator::with_base(&base, "& z < q").unwrap();
        assert!(extended.rules().contains("c/a"));
        assert_eq!(extended.compare("z", "q"), Ordering::Less);
        assert_eq!(extended.compare("a", "b"), Ordering::Less);
    }

    #[test]
    fn grammar_failure_aborts_construction() {
        assert!(RuleBasedCollator::new("").is_err());
        assert!(RuleBasedCollator::new("< a & nope < b").is_err());
    }

    #[test]
    fn regenerated_rules_build_an_equivalent_collator() {
        let col = RuleBasedCollator::new("< a, A < b, B < ch, Ch < d").unwrap();
        let rebuilt = RuleBasedCollator::new(&col.rules()).unwrap();
        for (x, y) in [("a", "A"), ("ach", "ad"), ("chb", "dB"), ("b", "B")] {
            assert_eq!(col.compare(x, y), rebuilt.compare(x, y));
        }
    }
}
