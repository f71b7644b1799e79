//! Stateful cursor over one text buffer, producing collation elements
//! forward and backward with random offset addressing.
//!
//! The iterator owns a decomposed copy of its source text and a frozen
//! snapshot of the collator configuration taken when it was bound. An
//! expansion is drained through a small element buffer with an index, so
//! the reported offset stays at the expansion's source boundary until the
//! buffer is empty — in both directions.

use std::ops::Range;
use std::sync::Arc;

use smallvec::SmallVec;
use thiserror::Error;

use crate::collator::RuleBasedCollator;
use crate::config::{CollatorConfig, Strength};
use crate::element::NULLORDER;
use crate::normalize::decompose;
use crate::table::{CollationTable, Elements};

/// `set_offset` (or a text range) addressed a position outside the bound
/// text. The iterator state is left untouched by the failed call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("offset {offset} is outside the bound range {start}..={end}")]
pub struct InvalidOffset {
    pub offset: usize,
    pub start: usize,
    pub end: usize,
}

/// Bidirectional, randomly addressable collation element cursor.
///
/// Not safe for concurrent use; create one iterator per thread, all sharing
/// the same table.
#[derive(Debug, Clone)]
pub struct CollationElementIterator {
    table: Arc<CollationTable>,
    config: CollatorConfig,
    /// Decomposed source chars of the bound range.
    buffer: Vec<char>,
    /// Offset of the bound range within the original text, in chars.
    base: usize,
    /// Current boundary offset within `buffer`.
    cursor: usize,
    /// Elements of the expansion currently being drained, forward order.
    expansion: Elements,
    /// Next forward position within `expansion`.
    exp_index: usize,
    draining: bool,
}

impl CollationElementIterator {
    pub(crate) fn bind(table: Arc<CollationTable>, config: CollatorConfig, text: &str) -> Self {
        let buffer = decompose(text, config.decomposition).chars().collect();
        CollationElementIterator {
            table,
            config,
            buffer,
            base: 0,
            cursor: 0,
            expansion: SmallVec::new(),
            exp_index: 0,
            draining: false,
        }
    }

    /// Next element in forward order, or [`NULLORDER`] at the end of the
    /// bound text.
    pub fn next(&mut self) -> i32 {
        if self.draining {
            if self.exp_index < self.expansion.len() {
                let element = self.expansion[self.exp_index];
                self.exp_index += 1;
                return self.strength_order(element);
            }
            self.clear_expansion();
        }
        if self.cursor >= self.buffer.len() {
            return NULLORDER;
        }
        let (elements, consumed) = self.table.lookup(&self.buffer, self.cursor);
        self.cursor += consumed;
        if elements.len() == 1 {
            return self.strength_order(elements[0]);
        }
        self.expansion = elements;
        self.exp_index = 1;
        self.draining = true;
        self.strength_order(self.expansion[0])
    }

    /// Next element in backward order, or [`NULLORDER`] at the start. An
    /// expansion's elements come out in reverse.
    pub fn previous(&mut self) -> i32 {
        if self.draining {
            if self.exp_index > 0 {
                self.exp_index -= 1;
                return self.strength_order(self.expansion[self.exp_index]);
            }
            self.clear_expansion();
        }
        if self.cursor == 0 {
            return NULLORDER;
        }
        let (elements, consumed) = self.table.lookup_back(&self.buffer, self.cursor);
        self.cursor -= consumed;
        if elements.len() == 1 {
            return self.strength_order(elements[0]);
        }
        self.expansion = elements;
        self.exp_index = self.expansion.len() - 1;
        self.draining = true;
        self.strength_order(self.expansion[self.exp_index])
    }

    /// Current boundary offset. After exhausting `next` this is the end of
    /// the bound range; after exhausting `previous` it is the range start.
    pub fn get_offset(&self) -> usize {
        self.base + self.cursor
    }

    /// Move the cursor. An offset strictly inside a contraction's span
    /// resolves to the whole contraction: the following `next` returns the
    /// contraction's element and `get_offset` reports the contraction's
    /// end.
    pub fn set_offset(&mut self, offset: usize) -> Result<(), InvalidOffset> {
        let end = self.base + self.buffer.len();
        if offset < self.base || offset > end {
            return Err(InvalidOffset {
                offset,
                start: self.base,
                end,
            });
        }
        let local = offset - self.base;
        self.clear_expansion();
        self.cursor = local;
        if local > 0 && local < self.buffer.len() {
            // Walk back over every position a contraction could start at
            // and see whether its greedy match spans past `local`.
            let window = self.table.max_contraction().saturating_sub(1);
            for start in (local.saturating_sub(window)..local).rev() {
                let (elements, consumed) = self.table.lookup(&self.buffer, start);
                if start + consumed > local {
                    self.expansion = elements;
                    self.exp_index = 0;
                    self.draining = true;
                    self.cursor = start + consumed;
                    break;
                }
            }
        }
        Ok(())
    }

    /// Back to the start of the bound range.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.clear_expansion();
    }

    /// Rebind to new source text. The collator's current strength and
    /// decomposition are captured now; whatever it is set to later does not
    /// reach this iterator.
    pub fn set_text(&mut self, collator: &RuleBasedCollator, text: &str) {
        self.config = collator.config();
        self.buffer = decompose(text, self.config.decomposition).chars().collect();
        self.base = 0;
        self.cursor = 0;
        self.clear_expansion();
    }

    /// Rebind to a char range of new source text; offsets keep their
    /// position within the full text.
    pub fn set_text_range(
        &mut self,
        collator: &RuleBasedCollator,
        text: &str,
        range: Range<usize>,
    ) -> Result<(), InvalidOffset> {
        let chars: Vec<char> = text.chars().collect();
        if range.start > range.end || range.end > chars.len() {
            return Err(InvalidOffset {
                offset: range.end,
                start: 0,
                end: chars.len(),
            });
        }
        let slice: String = chars[range.clone()].iter().collect();
        self.config = collator.config();
        self.buffer = decompose(&slice, self.config.decomposition).chars().collect();
        self.base = range.start;
        self.cursor = 0;
        self.clear_expansion();
        Ok(())
    }

    /// See [`CollationTable::max_expansion`].
    pub fn max_expansion(&self, element: i32) -> usize {
        self.table.max_expansion(element)
    }

    fn clear_expansion(&mut self) {
        self.expansion.clear();
        self.exp_index = 0;
        self.draining = false;
    }

    /// Zero out the weight levels beyond the snapshot strength, leaving the
    /// sentinel untouched.
    fn strength_order(&self, element: i32) -> i32 {
        if element == NULLORDER {
            return element;
        }
        match self.config.strength {
            Strength::Primary => (element as u32 & 0xFFFF_0000) as i32,
            Strength::Secondary => (element as u32 & 0xFFFF_FF00) as i32,
            _ => element,
        }
    }
}
