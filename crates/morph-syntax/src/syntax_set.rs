use crate::SyntaxKind;

const WORDS: usize = SyntaxKind::TOMBSTONE as usize / 64 + 1;

/// A bitset over every `SyntaxKind`, built in `const` contexts for the
/// parser's first and recovery sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyntaxSet {
    words: [u64; WORDS],
}

const fn locate(kind: SyntaxKind) -> (usize, u64) {
    let kind = kind as usize;
    (kind / 64, 1 << (kind % 64))
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { words: [0; WORDS] };

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut words = [0; WORDS];
        let mut i = 0;
        while i < N {
            let (word, bit) = locate(kinds[i]);
            words[word] |= bit;
            i += 1;
        }
        Self { words }
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;
        while i < WORDS {
            self.words[i] |= other.words[i];
            i += 1;
        }
        self
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let (word, bit) = locate(kind);
        self.words[word] & bit != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind::*;

    #[test]
    fn contains_kinds_from_every_word() {
        let set = SyntaxSet::new([OPEN_BRACE, VOID_KW, TOMBSTONE]);
        assert!(set.contains(OPEN_BRACE));
        assert!(set.contains(VOID_KW));
        assert!(set.contains(TOMBSTONE));
        assert!(!set.contains(CLOSE_BRACE));
        assert!(!SyntaxSet::EMPTY.contains(TOMBSTONE));
    }

    #[test]
    fn union_keeps_both_sides() {
        let set = SyntaxSet::new([IDENTIFIER]).union(&SyntaxSet::new([ERROR]));
        assert!(set.contains(IDENTIFIER));
        assert!(set.contains(ERROR));
        assert!(!set.contains(EOF));
    }
}
