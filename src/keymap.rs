//! Coordinates for the 12-key grid: matrix position, key slot, and LED index.
//!
//! Three coordinate spaces meet on this board:
//!
//! - **Matrix position**: the `(column, row)` pair the scanner sees, 4 columns × 3 rows.
//! - **[`KeySlot`]**: the logical key number `0..12`, row-major (`row * 4 + column`).
//! - **[`LedIndex`]**: the position on the LED strip `0..12`. The strip is chained down each
//!   column in turn, so it is related to [`KeySlot`] by the fixed table [`KEY_TO_LED`].
//!
//! The tables here are wiring constants. They are written out literally and never computed.
//!
//! # Example
//!
//! ```
//! use keypad_game::keymap::{KeySlot, to_key_slot, to_led_index};
//!
//! let key = to_key_slot(2, 1);
//! assert_eq!(key.get(), 6);
//! assert_eq!(to_led_index(key).get(), 7);
//! ```

use core::fmt;

use crate::{Error, Result};

/// Number of columns driven by the scanner.
pub const COLUMN_COUNT: usize = 4;

/// Number of rows sampled by the scanner.
pub const ROW_COUNT: usize = 3;

/// Number of keys (and LEDs) on the board.
pub const KEY_COUNT: usize = COLUMN_COUNT * ROW_COUNT;

// ============================================================================
// KeySlot
// ============================================================================

/// Logical identifier `0..12` for one physical key, row-major over the 4×3 grid.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, defmt::Format)]
pub struct KeySlot(u8);

impl KeySlot {
    /// Every key slot in ascending order.
    pub const ALL: [Self; KEY_COUNT] = {
        let mut all = [Self(0); KEY_COUNT];
        let mut index = 0;
        while index < KEY_COUNT {
            all[index] = Self(index as u8);
            index += 1;
        }
        all
    };

    /// Creates a key slot, checking that it is on the grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeySlotOutOfRange`] if `slot >= 12`.
    pub const fn new(slot: u8) -> Result<Self> {
        if (slot as usize) < KEY_COUNT {
            Ok(Self(slot))
        } else {
            Err(Error::KeySlotOutOfRange(slot))
        }
    }

    /// The raw slot number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The slot number as an array index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for KeySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K{}", self.0)
    }
}

impl TryFrom<u8> for KeySlot {
    type Error = Error;

    fn try_from(slot: u8) -> Result<Self> {
        Self::new(slot)
    }
}

// ============================================================================
// LedIndex
// ============================================================================

/// Identifier `0..12` for one LED position on the strip.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, defmt::Format)]
pub struct LedIndex(u8);

impl LedIndex {
    /// Creates an LED index, checking that it is on the strip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LedIndexOutOfRange`] if `index >= 12`.
    pub const fn new(index: u8) -> Result<Self> {
        if (index as usize) < KEY_COUNT {
            Ok(Self(index))
        } else {
            Err(Error::LedIndexOutOfRange(index))
        }
    }

    /// The raw LED position.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The LED position as an array index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

// ============================================================================
// Wiring tables
// ============================================================================

/// `KEY_TO_LED[slot]` is the strip position under key `slot`.
///
/// The strip runs down column 0, then column 1, and so on, while key slots count across rows.
pub const KEY_TO_LED: [LedIndex; KEY_COUNT] = [
    LedIndex(0),
    LedIndex(3),
    LedIndex(6),
    LedIndex(9),
    LedIndex(1),
    LedIndex(4),
    LedIndex(7),
    LedIndex(10),
    LedIndex(2),
    LedIndex(5),
    LedIndex(8),
    LedIndex(11),
];

/// Order in which the sequence-recall game arms keys during one lap.
///
/// Slots 4 and 7 are never visited.
pub const VISIT_ORDER: [KeySlot; 10] = [
    KeySlot(0),
    KeySlot(3),
    KeySlot(6),
    KeySlot(9),
    KeySlot(10),
    KeySlot(11),
    KeySlot(8),
    KeySlot(5),
    KeySlot(2),
    KeySlot(1),
];

// ============================================================================
// Mapping
// ============================================================================

/// Key slot for the key at matrix position `(column, row)`.
///
/// `column` must be `< 4` and `row` must be `< 3`; the scanner only ever produces such pairs.
/// Use [`try_to_key_slot`] for unchecked input.
#[must_use]
pub const fn to_key_slot(column: u8, row: u8) -> KeySlot {
    debug_assert!((column as usize) < COLUMN_COUNT && (row as usize) < ROW_COUNT);
    // On the grid this is at most 11, so neither operation wraps.
    KeySlot(row.wrapping_mul(COLUMN_COUNT as u8).wrapping_add(column))
}

/// Checked form of [`to_key_slot`].
///
/// # Errors
///
/// Returns [`Error::ColumnOutOfRange`] or [`Error::RowOutOfRange`] for positions off the grid.
pub const fn try_to_key_slot(column: u8, row: u8) -> Result<KeySlot> {
    if column as usize >= COLUMN_COUNT {
        return Err(Error::ColumnOutOfRange(column));
    }
    if row as usize >= ROW_COUNT {
        return Err(Error::RowOutOfRange(row));
    }
    Ok(to_key_slot(column, row))
}

/// Matrix position `(column, row)` of a key slot.
#[must_use]
pub const fn to_matrix(key: KeySlot) -> (u8, u8) {
    let columns = COLUMN_COUNT as u8;
    (key.0 % columns, key.0 / columns)
}

/// Strip position of the LED under a key.
#[must_use]
#[allow(clippy::indexing_slicing, reason = "a KeySlot is always below KEY_COUNT")]
pub const fn to_led_index(key: KeySlot) -> LedIndex {
    KEY_TO_LED[key.index()]
}

// ============================================================================
// KeySet
// ============================================================================

/// A set of key slots, stored as a 12-bit mask.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, defmt::Format)]
pub struct KeySet(u16);

impl KeySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Every key on the grid.
    pub const FULL: Self = Self((1 << KEY_COUNT) - 1);

    /// Builds a set from a slice of keys.
    #[must_use]
    pub const fn from_keys(keys: &[KeySlot]) -> Self {
        let mut set = Self::EMPTY;
        let mut rest = keys;
        while let [key, tail @ ..] = rest {
            set = set.with(*key);
            rest = tail;
        }
        set
    }

    /// A copy of this set with `key` added.
    #[must_use]
    pub const fn with(self, key: KeySlot) -> Self {
        Self(self.0 | 1 << key.0)
    }

    /// Adds `key`; returns `true` if it was not already present.
    pub const fn insert(&mut self, key: KeySlot) -> bool {
        let was_absent = !self.contains(key);
        self.0 |= 1 << key.0;
        was_absent
    }

    /// Removes `key`; returns `true` if it was present.
    pub const fn remove(&mut self, key: KeySlot) -> bool {
        let was_present = self.contains(key);
        self.0 &= !(1 << key.0);
        was_present
    }

    /// Whether `key` is in the set.
    #[must_use]
    pub const fn contains(self, key: KeySlot) -> bool {
        self.0 & (1 << key.0) != 0
    }

    /// Number of keys in the set.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Keys not in this set.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(!self.0 & Self::FULL.0)
    }

    /// Keys in ascending slot order.
    pub fn iter(self) -> impl Iterator<Item = KeySlot> {
        KeySlot::ALL.into_iter().filter(move |key| self.contains(*key))
    }
}

impl FromIterator<KeySlot> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeySlot>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}
