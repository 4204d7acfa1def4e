//! Bit-parallel truth tables used as simulation vectors.
//!
//! A truth table over `k` variables stores `2^k` bits, one per input assignment.
//! Bit `i` holds the function value for the assignment whose variable `j` equals
//! bit `j` of `i`, so variable 0 is the least significant position.
//!
//! Tables with fewer than 6 variables occupy a single word; bits above `2^k`
//! are always kept at zero, so every operation masks its result.

use std::fmt::{Debug, Display, Formatter};
use std::ops::{BitAndAssign, BitOrAssign, BitXorAssign, Not};

/// Projection patterns for the variables living inside one word.
const PROJECTIONS: [u64; 6] = [
    0xAAAA_AAAA_AAAA_AAAA,
    0xCCCC_CCCC_CCCC_CCCC,
    0xF0F0_F0F0_F0F0_F0F0,
    0xFF00_FF00_FF00_FF00,
    0xFFFF_0000_FFFF_0000,
    0xFFFF_FFFF_0000_0000,
];

/// A truth table over `num_vars` variables backed by a vector of u64 words.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct TruthTable {
    num_vars: u32,
    /// Storage: each u64 holds 64 bits
    words: Vec<u64>,
}

impl TruthTable {
    /// Number of bits per word.
    const BITS_PER_WORD: u64 = 64;

    /// Largest supported variable count.
    pub const MAX_VARS: u32 = 40;

    fn num_words(num_vars: u32) -> usize {
        if num_vars <= 6 {
            1
        } else {
            1 << (num_vars - 6)
        }
    }

    /// Mask of the valid bits in each word.
    fn mask(num_vars: u32) -> u64 {
        if num_vars >= 6 {
            u64::MAX
        } else {
            (1u64 << (1u32 << num_vars)) - 1
        }
    }

    /// Creates the constant-zero table over `num_vars` variables.
    pub fn zero(num_vars: u32) -> Self {
        assert!(
            num_vars <= Self::MAX_VARS,
            "Truth tables support at most {} variables",
            Self::MAX_VARS
        );
        Self {
            num_vars,
            words: vec![0; Self::num_words(num_vars)],
        }
    }

    /// Creates the constant-one table over `num_vars` variables.
    pub fn one(num_vars: u32) -> Self {
        assert!(
            num_vars <= Self::MAX_VARS,
            "Truth tables support at most {} variables",
            Self::MAX_VARS
        );
        Self {
            num_vars,
            words: vec![Self::mask(num_vars); Self::num_words(num_vars)],
        }
    }

    /// Creates a constant table.
    pub fn constant(num_vars: u32, value: bool) -> Self {
        if value {
            Self::one(num_vars)
        } else {
            Self::zero(num_vars)
        }
    }

    /// Creates the projection function of variable `var` over `num_vars` variables.
    ///
    /// Bit `i` of the result equals bit `var` of `i`.
    pub fn nth_var(num_vars: u32, var: u32) -> Self {
        assert!(var < num_vars, "Variable {} out of range for {}-variable table", var, num_vars);
        let mut tt = Self::zero(num_vars);
        if var < 6 {
            let pattern = PROJECTIONS[var as usize] & Self::mask(num_vars);
            tt.words.fill(pattern);
        } else {
            let shift = var - 6;
            for (i, word) in tt.words.iter_mut().enumerate() {
                if (i >> shift) & 1 == 1 {
                    *word = u64::MAX;
                }
            }
        }
        tt
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    /// Number of bits (`2^num_vars`).
    pub fn num_bits(&self) -> u64 {
        1u64 << self.num_vars
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    fn word_and_bit(index: u64) -> (usize, u64) {
        let word = index / Self::BITS_PER_WORD;
        let bit = index % Self::BITS_PER_WORD;
        (word as usize, bit)
    }

    /// Returns the bit at the given index.
    #[inline]
    pub fn bit(&self, index: u64) -> bool {
        assert!(index < self.num_bits(), "Bit {} out of range", index);
        let (word_idx, bit_idx) = Self::word_and_bit(index);
        (self.words[word_idx] >> bit_idx) & 1 == 1
    }

    pub fn is_const0(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_const1(&self) -> bool {
        let mask = Self::mask(self.num_vars);
        self.words.iter().all(|&w| w == mask)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Complements the table in place.
    pub fn complement_in_place(&mut self) {
        let mask = Self::mask(self.num_vars);
        for word in &mut self.words {
            *word = !*word & mask;
        }
    }

    /// Applies `op` word by word with `other` into `self`.
    fn combine(&mut self, other: TableRef<'_>, op: impl Fn(u64, u64) -> u64) {
        assert_eq!(self.num_vars, other.num_vars(), "Variable count mismatch");
        for (word, rhs) in self.words.iter_mut().zip(other.words()) {
            *word = op(*word, rhs);
        }
    }

    /// Builds a new table from three operands, word by word.
    pub fn ternary(a: TableRef<'_>, b: TableRef<'_>, c: TableRef<'_>, op: impl Fn(u64, u64, u64) -> u64) -> Self {
        assert!(
            a.num_vars() == b.num_vars() && b.num_vars() == c.num_vars(),
            "Variable count mismatch"
        );
        let mask = Self::mask(a.num_vars());
        Self {
            num_vars: a.num_vars(),
            words: a
                .words()
                .zip(b.words())
                .zip(c.words())
                .map(|((a, b), c)| op(a, b, c) & mask)
                .collect(),
        }
    }
}

/// A borrowed truth table, read either as is or complemented.
///
/// Gate evaluation takes its operands this way, so fanin values are never copied.
#[derive(Debug, Copy, Clone)]
pub struct TableRef<'a> {
    table: &'a TruthTable,
    complemented: bool,
}

impl<'a> TableRef<'a> {
    pub fn new(table: &'a TruthTable, complemented: bool) -> Self {
        Self { table, complemented }
    }

    pub fn num_vars(self) -> u32 {
        self.table.num_vars
    }

    /// Words as seen through the complement.
    fn words(self) -> impl Iterator<Item = u64> + 'a {
        let flip = if self.complemented {
            TruthTable::mask(self.table.num_vars)
        } else {
            0
        };
        self.table.words.iter().map(move |&w| w ^ flip)
    }

    /// Index of the lowest set bit, if any.
    pub fn first_one(self) -> Option<u64> {
        self.words()
            .enumerate()
            .find(|&(_, w)| w != 0)
            .map(|(i, w)| i as u64 * TruthTable::BITS_PER_WORD + w.trailing_zeros() as u64)
    }

    /// Materializes the view into an owned table.
    pub fn to_table(self) -> TruthTable {
        TruthTable {
            num_vars: self.table.num_vars,
            words: self.words().collect(),
        }
    }
}

impl<'a> From<&'a TruthTable> for TableRef<'a> {
    fn from(table: &'a TruthTable) -> Self {
        Self::new(table, false)
    }
}

impl Not for TableRef<'_> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::new(self.table, !self.complemented)
    }
}

impl Not for TruthTable {
    type Output = TruthTable;

    fn not(mut self) -> Self::Output {
        self.complement_in_place();
        self
    }
}

impl BitAndAssign<TableRef<'_>> for TruthTable {
    fn bitand_assign(&mut self, rhs: TableRef<'_>) {
        self.combine(rhs, |a, b| a & b);
    }
}

impl BitOrAssign<TableRef<'_>> for TruthTable {
    fn bitor_assign(&mut self, rhs: TableRef<'_>) {
        self.combine(rhs, |a, b| a | b);
    }
}

impl BitXorAssign<TableRef<'_>> for TruthTable {
    fn bitxor_assign(&mut self, rhs: TableRef<'_>) {
        self.combine(rhs, |a, b| a ^ b);
    }
}

impl Display for TruthTable {
    /// Hexadecimal, most significant word first.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let digits = if self.num_vars >= 6 { 16 } else { ((1usize << self.num_vars) + 3) / 4 };
        for word in self.words.iter().rev() {
            write!(f, "{:0width$x}", word, width = digits)?;
        }
        Ok(())
    }
}

impl Debug for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.num_vars <= 8 {
            write!(f, "TruthTable({}: {})", self.num_vars, self)
        } else {
            write!(f, "TruthTable({}: {} words)", self.num_vars, self.words.len())
        }
    }
}
