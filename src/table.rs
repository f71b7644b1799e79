//! The collation element table.
//!
//! Built once from a [`RuleSet`], immutable afterwards, shared by reference
//! between every collator and iterator derived from it. Weights are
//! materialized here, after all `&`-resets have spliced the entry list, so
//! arbitrary-position insertion never renumbers anything.

use std::collections::HashMap;

use smallvec::{SmallVec, smallvec};

use crate::element::{MAX_PRIMARY, MIN_SECONDARY, MIN_TERTIARY, default_elements, pack};
use crate::rules::{ParseError, Relation, RuleSet};

/// Ordered elements a source sequence maps to. One element for a plain
/// entry, several for an expansion.
pub type Elements = SmallVec<[i32; 2]>;

/// Immutable weight table: contraction keys to ordered elements, plus the
/// bounds the iterator needs for lookahead and lookbehind.
#[derive(Debug)]
pub struct CollationTable {
    singles: HashMap<char, Elements>,
    contractions: HashMap<Box<[char]>, Elements>,
    /// Longest contraction key, in chars. At least 1.
    max_contraction: usize,
    /// Every multi-element mapping, for `max_expansion`.
    expansions: Vec<Elements>,
    /// The merged entry list the table was built from; retained for rule
    /// regeneration and base-table extension.
    rules: RuleSet,
}

impl CollationTable {
    /// Materialize weights for a merged rule set.
    ///
    /// Two phases: walk the entries in collation order assigning
    /// (primary, secondary, tertiary) counters per relation, then resolve
    /// extension characters into expansion element lists. Extensions may
    /// reference entries defined later in the rules; phase two runs after
    /// every order is known.
    pub fn build(rules: RuleSet) -> Result<Self, ParseError> {
        let entries = rules.entries();

        // Phase 1: assign one packed order per entry.
        let mut primary: u32 = 0;
        let mut secondary: u32 = 0;
        let mut tertiary: u32 = 0;
        let mut orders = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.relation {
                Relation::Primary => {
                    primary += 1;
                    secondary = MIN_SECONDARY as u32;
                    tertiary = MIN_TERTIARY as u32;
                    if primary > MAX_PRIMARY as u32 {
                        return Err(ParseError::WeightOverflow("primary"));
                    }
                }
                Relation::Secondary => {
                    secondary += 1;
                    tertiary = MIN_TERTIARY as u32;
                    if secondary > 0xFF {
                        return Err(ParseError::WeightOverflow("secondary"));
                    }
                }
                Relation::Tertiary => {
                    tertiary += 1;
                    if tertiary > 0xFF {
                        return Err(ParseError::WeightOverflow("tertiary"));
                    }
                }
                Relation::Identical => {}
            }
            orders.push(pack(primary as u16, secondary as u8, tertiary as u8));
        }

        // Order of each single-char entry, for extension resolution.
        // The latest definition wins, matching lookup behaviour.
        let mut single_orders: HashMap<char, i32> = HashMap::new();
        for (entry, &order) in entries.iter().zip(&orders) {
            let mut chars = entry.chars.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                single_orders.insert(c, order);
            }
        }

        // Phase 2: build the maps.
        let mut table = CollationTable {
            singles: HashMap::new(),
            contractions: HashMap::new(),
            max_contraction: 1,
            expansions: Vec::new(),
            rules: RuleSet::default(),
        };
        for (entry, &order) in entries.iter().zip(&orders) {
            let mut elements: Elements = smallvec![order];
            for c in entry.extension.chars() {
                match single_orders.get(&c) {
                    Some(&o) => elements.push(o),
                    None => {
                        let (first, second) = default_elements(c);
                        elements.push(first);
                        if let Some(second) = second {
                            elements.push(second);
                        }
                    }
                }
            }
            if elements.len() > 1 {
                table.expansions.push(elements.clone());
            }

            let key: Vec<char> = entry.chars.chars().collect();
            table.max_contraction = table.max_contraction.max(key.len());
            match key.as_slice() {
                [c] => {
                    table.singles.insert(*c, elements);
                }
                _ => {
                    table.contractions.insert(key.into_boxed_slice(), elements);
                }
            }
        }
        table.rules = rules;
        Ok(table)
    }

    /// Greedy longest-match lookup at `pos`. Returns the matched elements
    /// and how many chars of `text` they consume (always at least 1 while
    /// `pos` is in bounds, so scanning terminates on any input).
    pub fn lookup(&self, text: &[char], pos: usize) -> (Elements, usize) {
        debug_assert!(pos < text.len());
        let longest = self.max_contraction.min(text.len() - pos);
        for len in (2..=longest).rev() {
            if let Some(elements) = self.contractions.get(&text[pos..pos + len]) {
                return (elements.clone(), len);
            }
        }
        let c = text[pos];
        if let Some(elements) = self.singles.get(&c) {
            return (elements.clone(), 1);
        }
        let (first, second) = default_elements(c);
        match second {
            None => (smallvec![first], 1),
            Some(second) => (smallvec![first, second], 1),
        }
    }

    /// Greedy longest-match lookup for a sequence ending at `end`
    /// (exclusive), used by backward iteration.
    pub fn lookup_back(&self, text: &[char], end: usize) -> (Elements, usize) {
        debug_assert!(end > 0 && end <= text.len());
        let longest = self.max_contraction.min(end);
        for len in (2..=longest).rev() {
            if let Some(elements) = self.contractions.get(&text[end - len..end]) {
                return (elements.clone(), len);
            }
        }
        let c = text[end - 1];
        if let Some(elements) = self.singles.get(&c) {
            return (elements.clone(), 1);
        }
        let (first, second) = default_elements(c);
        match second {
            None => (smallvec![first], 1),
            Some(second) => (smallvec![first, second], 1),
        }
    }

    /// Number of elements of the longest expansion the given element
    /// participates in; 1 when it expands nothing.
    pub fn max_expansion(&self, element: i32) -> usize {
        self.expansions
            .iter()
            .filter(|list| list.contains(&element))
            .map(|list| list.len())
            .max()
            .unwrap_or(1)
    }

    /// Longest contraction key in chars (1 when there are no contractions).
    pub fn max_contraction(&self) -> usize {
        self.max_contraction
    }

    /// The merged rule entries this table was built from.
    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }
}
