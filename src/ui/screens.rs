/// Row selection for the table screens. The cursor never owns the rows; it is
/// clamped against whatever list the page currently holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListCursor {
    pub(crate) selected: usize,
}

impl ListCursor {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let last = len as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Keep the selection inside the list after a reload.
    pub(crate) fn ensure_in_bounds(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move onto the row matching `key`, if it is still present.
    pub(crate) fn focus<'a, I>(&mut self, keys: I, key: &str)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Some(idx) = keys.into_iter().position(|candidate| candidate == key) {
            self.selected = idx;
        }
    }
}

/// Student roster shown as a grid of cards when picking whose enrollments to
/// view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RosterGrid {
    pub(crate) selected: usize,
}

impl RosterGrid {
    pub(crate) const COLUMNS: usize = 4;

    pub(crate) fn move_horizontal(&mut self, offset: isize, len: usize) {
        if len == 0 {
            return;
        }
        let new = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = new as usize;
    }

    pub(crate) fn move_vertical(&mut self, offset: isize, len: usize) {
        if len == 0 {
            return;
        }
        let target = self.selected as isize + offset * Self::COLUMNS as isize;
        if (0..len as isize).contains(&target) {
            self.selected = target as usize;
        }
    }

    pub(crate) fn row_count(len: usize) -> usize {
        len.div_ceil(Self::COLUMNS)
    }

    /// First row to draw so the selected card stays on screen.
    pub(crate) fn first_visible_row(&self, visible_rows: usize) -> usize {
        let row = self.selected / Self::COLUMNS;
        if visible_rows == 0 {
            row
        } else {
            row.saturating_sub(visible_rows - 1)
        }
    }
}
