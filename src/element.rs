//! Packed collation elements.
//!
//! A collation element carries one (primary, secondary, tertiary) weight
//! triple packed into a single `i32`:
//!
//! ```text
//! bits 31..16   primary   (16 bits)
//! bits 15..8    secondary (8 bits)
//! bits  7..0    tertiary  (8 bits)
//! ```
//!
//! [`NULLORDER`] (`-1`) marks end-of-sequence. The table builder caps the
//! weight space so no valid element ever packs to `-1`.

/// End-of-sequence sentinel returned by the element iterator.
pub const NULLORDER: i32 = -1;

/// Smallest secondary weight a weighted element carries. Weight `0` at a
/// level means "ignorable at this level".
pub(crate) const MIN_SECONDARY: u8 = 1;

/// Smallest tertiary weight a weighted element carries.
pub(crate) const MIN_TERTIARY: u8 = 1;

/// Largest primary the rule builder may assign. `0xFFFF` is reserved so
/// that a fully saturated element can never collide with [`NULLORDER`].
pub(crate) const MAX_PRIMARY: u16 = 0xFFFE;

#[inline(always)]
pub(crate) const fn pack(primary: u16, secondary: u8, tertiary: u8) -> i32 {
    (((primary as u32) << 16) | ((secondary as u32) << 8) | tertiary as u32) as i32
}

/// Primary weight of a packed element.
#[inline(always)]
pub fn primary_order(element: i32) -> u16 {
    ((element as u32) >> 16) as u16
}

/// Secondary weight of a packed element.
#[inline(always)]
pub fn secondary_order(element: i32) -> u8 {
    ((element as u32) >> 8) as u8
}

/// Tertiary weight of a packed element.
#[inline(always)]
pub fn tertiary_order(element: i32) -> u8 {
    element as u8
}

/// A completely ignorable element: zero weight at every level.
#[inline(always)]
pub(crate) fn is_ignorable(element: i32) -> bool {
    element == 0
}

/// Default element(s) for a code point with no tailoring entry.
///
/// Untailored text sorts by UTF-16 code-unit order: BMP code points map to
/// one element whose primary is the code point itself, supplementary code
/// points map to the two elements of their surrogate pair. This keeps the
/// primary level within 16 bits for all of Unicode.
#[inline]
pub(crate) fn default_elements(c: char) -> (i32, Option<i32>) {
    let cp = c as u32;
    if cp <= 0xFFFF {
        (pack(cp as u16, MIN_SECONDARY, MIN_TERTIARY), None)
    } else {
        let hi = 0xD800 + ((cp - 0x1_0000) >> 10);
        let lo = 0xDC00 + (cp & 0x3FF);
        (
            pack(hi as u16, MIN_SECONDARY, MIN_TERTIARY),
            Some(pack(lo as u16, MIN_SECONDARY, MIN_TERTIARY)),
        )
    }
}
