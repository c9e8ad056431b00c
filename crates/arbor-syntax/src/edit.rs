use text_size::{TextRange, TextSize};

/// A single text edit: delete `delete`, then insert `insert` at its start.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Indel {
    pub insert: String,
    /// Refers to offsets in the original text.
    pub delete: TextRange,
}

impl Indel {
    pub fn insert(offset: TextSize, text: String) -> Self {
        Self::replace(TextRange::empty(offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::replace(range, String::new())
    }

    pub fn replace(range: TextRange, replace_with: String) -> Self {
        Self { delete: range, insert: replace_with }
    }

    /// Applies the edit to `text` in place.
    ///
    /// # Panics
    ///
    /// If `delete` is out of bounds or not on char boundaries.
    #[track_caller]
    pub fn apply(&self, text: &mut String) {
        let start: usize = self.delete.start().into();
        let end: usize = self.delete.end().into();
        text.replace_range(start..end, &self.insert);
    }

    /// Length of the inserted text.
    pub fn insert_len(&self) -> TextSize {
        TextSize::of(&self.insert)
    }

    /// Returns `true` if applying the edit would not change any text.
    pub fn is_noop(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }

    /// Maps a range of the original text to the edited text.
    ///
    /// Ranges strictly before or after the deleted range are kept or shifted;
    /// ranges that overlap it have no counterpart and yield `None`.
    pub fn shift_range(&self, range: TextRange) -> Option<TextRange> {
        if range.end() <= self.delete.start() {
            return Some(range);
        }
        if self.delete.end() <= range.start() {
            let start = range.start() - self.delete.end() + self.delete.start() + self.insert_len();
            return Some(TextRange::at(start, range.len()));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn apply_replaces_text() {
        let mut text = String::from("fn foo() {}");
        Indel::replace(range(3, 6), "bar_baz".to_owned()).apply(&mut text);
        assert_eq!(text, "fn bar_baz() {}");

        Indel::insert(0.into(), "pub ".to_owned()).apply(&mut text);
        assert_eq!(text, "pub fn bar_baz() {}");

        Indel::delete(range(0, 4)).apply(&mut text);
        assert_eq!(text, "fn bar_baz() {}");
    }

    #[test]
    fn shift_range_moves_ranges_after_the_edit() {
        let indel = Indel::replace(range(4, 6), "xyz".to_owned());

        assert_eq!(indel.shift_range(range(0, 4)), Some(range(0, 4)));
        assert_eq!(indel.shift_range(range(6, 8)), Some(range(7, 9)));
        assert_eq!(indel.shift_range(range(5, 8)), None);
        assert_eq!(indel.shift_range(range(2, 5)), None);
    }

    #[test]
    fn shift_range_around_pure_insertion() {
        let indel = Indel::insert(4.into(), "ab".to_owned());

        assert_eq!(indel.shift_range(range(0, 4)), Some(range(0, 4)));
        assert_eq!(indel.shift_range(range(4, 6)), Some(range(6, 8)));
        assert!(!indel.is_noop());
        assert!(Indel::insert(4.into(), String::new()).is_noop());
    }
}
