use crate::gfx::scene::ObjectKind;

/// The single highlighted object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: ObjectKind,
    pub index: usize,
}

impl Selection {
    pub fn new(kind: ObjectKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Next object of `kind` after `current`
    ///
    /// The current index is used whatever its kind, so switching kinds
    /// continues from the same position. With nothing selected the first
    /// object is chosen. Returns `None` when there is no object of `kind`.
    pub fn next(current: Option<Selection>, kind: ObjectKind, count: usize) -> Option<Selection> {
        if count == 0 {
            return None;
        }
        let index = current.map_or(0, |s| (s.index + 1) % count);
        Some(Self::new(kind, index))
    }

    /// Previous object of `kind` before `current`, wrapping to the last one
    pub fn previous(current: Option<Selection>, kind: ObjectKind, count: usize) -> Option<Selection> {
        if count == 0 {
            return None;
        }
        let index = match current {
            Some(s) if s.index > 0 => (s.index - 1) % count,
            _ => count - 1,
        };
        Some(Self::new(kind, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETS: ObjectKind = ObjectKind::TriangleSet;
    const ELLIPSOIDS: ObjectKind = ObjectKind::Ellipsoid;

    #[test]
    fn test_next_from_nothing_selects_first() {
        assert_eq!(Selection::next(None, SETS, 3), Some(Selection::new(SETS, 0)));
    }

    #[test]
    fn test_next_wraps() {
        let last = Some(Selection::new(SETS, 2));
        assert_eq!(Selection::next(last, SETS, 3), Some(Selection::new(SETS, 0)));
    }

    #[test]
    fn test_previous_from_nothing_or_first_selects_last() {
        assert_eq!(Selection::previous(None, SETS, 3), Some(Selection::new(SETS, 2)));
        let first = Some(Selection::new(SETS, 0));
        assert_eq!(Selection::previous(first, SETS, 3), Some(Selection::new(SETS, 2)));
    }

    #[test]
    fn test_index_carries_across_kinds() {
        let ellipsoid = Some(Selection::new(ELLIPSOIDS, 1));
        assert_eq!(Selection::next(ellipsoid, SETS, 5), Some(Selection::new(SETS, 2)));
        assert_eq!(Selection::previous(ellipsoid, SETS, 5), Some(Selection::new(SETS, 0)));

        // A carried index larger than the other collection still lands in range
        let far = Some(Selection::new(ELLIPSOIDS, 6));
        assert_eq!(Selection::previous(far, SETS, 2), Some(Selection::new(SETS, 1)));
        assert_eq!(Selection::next(far, SETS, 2), Some(Selection::new(SETS, 1)));
    }

    #[test]
    fn test_empty_collection_selects_nothing() {
        assert_eq!(Selection::next(None, ELLIPSOIDS, 0), None);
        assert_eq!(Selection::previous(Some(Selection::new(SETS, 0)), ELLIPSOIDS, 0), None);
    }
}
