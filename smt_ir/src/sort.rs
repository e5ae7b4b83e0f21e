//! Sorts (types) of symbolic terms.

use serde::{Deserialize, Serialize};

/// Bit width of the index sort used for array indices and lengths.
pub const INDEX_BITS: u32 = 64;

/// The sort of a symbolic term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sort {
    /// Booleans
    Bool,

    /// Fixed-width bit-vectors
    BitVec(u32),

    /// Arrays (total maps) from an index sort to an element sort.
    /// Lambda terms also carry this sort.
    Array { index: Box<Sort>, elem: Box<Sort> },

    /// Finite bags (multisets) over an element sort
    Bag(Box<Sort>),
}

impl Sort {
    /// Bit-vector sort of the given width.
    #[must_use]
    pub const fn bv(width: u32) -> Self {
        Self::BitVec(width)
    }

    /// Array sort with the given index and element sorts.
    #[must_use]
    pub fn array(index: Sort, elem: Sort) -> Self {
        Self::Array {
            index: Box::new(index),
            elem: Box::new(elem),
        }
    }

    /// Bag sort over the given element sort.
    #[must_use]
    pub fn bag(elem: Sort) -> Self {
        Self::Bag(Box::new(elem))
    }

    /// The sort of array indices and lengths.
    #[must_use]
    pub const fn index() -> Self {
        Self::BitVec(INDEX_BITS)
    }

    /// Returns true if this is a bit-vector sort.
    #[must_use]
    pub const fn is_bitvec(&self) -> bool {
        matches!(self, Self::BitVec(_))
    }

    /// Returns true if this is an array sort.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// Width of a bit-vector sort.
    ///
    /// # Panics
    ///
    /// Panics if the sort is not a bit-vector.
    #[must_use]
    pub fn bitwidth(&self) -> u32 {
        match self {
            Self::BitVec(w) => *w,
            other => panic!("bitwidth of non-bitvec sort {other}"),
        }
    }

    /// Element sort of an array or bag sort.
    ///
    /// # Panics
    ///
    /// Panics if the sort has no elements.
    #[must_use]
    pub fn elem(&self) -> &Sort {
        match self {
            Self::Array { elem, .. } | Self::Bag(elem) => elem,
            other => panic!("elem of non-container sort {other}"),
        }
    }

    /// Index sort of an array sort.
    ///
    /// # Panics
    ///
    /// Panics if the sort is not an array.
    #[must_use]
    pub fn index_sort(&self) -> &Sort {
        match self {
            Self::Array { index, .. } => index,
            other => panic!("index sort of non-array sort {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bv_sort_width() {
        assert_eq!(Sort::bv(33).bitwidth(), 33);
        assert!(Sort::bv(1).is_bitvec());
        assert!(!Sort::Bool.is_bitvec());
    }

    #[test]
    fn test_index_sort_is_bitvec() {
        assert_eq!(Sort::index(), Sort::BitVec(INDEX_BITS));
    }

    #[test]
    fn test_array_sort_accessors() {
        let arr = Sort::array(Sort::index(), Sort::bv(8));
        assert!(arr.is_array());
        assert_eq!(*arr.elem(), Sort::bv(8));
        assert_eq!(*arr.index_sort(), Sort::index());
    }

    #[test]
    fn test_bag_sort_elem() {
        let bag = Sort::bag(Sort::bv(10));
        assert_eq!(*bag.elem(), Sort::bv(10));
    }

    #[test]
    #[should_panic(expected = "bitwidth of non-bitvec")]
    fn test_bitwidth_of_bool_panics() {
        let _ = Sort::Bool.bitwidth();
    }

    #[test]
    fn test_sort_ordering_is_total() {
        let mut sorts = vec![
            Sort::bag(Sort::bv(4)),
            Sort::Bool,
            Sort::bv(4),
            Sort::array(Sort::index(), Sort::bv(4)),
        ];
        sorts.sort();
        sorts.sort(); // idempotent
        assert_eq!(sorts[0], Sort::Bool);
    }

    #[test]
    fn test_sort_serialization_roundtrip() {
        let sort = Sort::array(Sort::index(), Sort::bv(10));
        let json = serde_json::to_string(&sort).expect("serialize");
        let parsed: Sort = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, sort);
    }
}
