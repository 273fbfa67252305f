//! Canonical slot coordinates for each rule set.
//!
//! Coordinates are in slot units; the presentation layer scales them to
//! pixels. Classic slots run left to right along `y = 0`. Pyramid slots fill
//! rows of 1, 2, 3, ... cups from the top, each row centred on `x = 0`.

use crate::core::Position;

use super::Rules;

/// Row and column of a pyramid slot.
///
/// Row `r` holds `r + 1` slots, so slot `i` lives in the row whose
/// triangular start `r * (r + 1) / 2` is the largest one not above `i`.
///
/// ```
/// use shell_game::rules::pyramid_cell;
///
/// assert_eq!(pyramid_cell(0), (0, 0));
/// assert_eq!(pyramid_cell(2), (1, 1));
/// assert_eq!(pyramid_cell(3), (2, 0));
/// ```
#[must_use]
pub fn pyramid_cell(slot: usize) -> (usize, usize) {
    let mut row = 0;
    let mut row_start = 0;
    while row_start + row < slot {
        row_start += row + 1;
        row += 1;
    }
    (row, slot - row_start)
}

/// Resting positions of every slot for `cup_count` cups.
#[must_use]
pub fn slot_layout(rules: Rules, cup_count: usize) -> Vec<Position> {
    match rules {
        Rules::Classic => (0..cup_count).map(|i| Position::new(i as f32, 0.0)).collect(),
        Rules::Pyramid => (0..cup_count)
            .map(|slot| {
                let (row, col) = pyramid_cell(slot);
                let row_start = row * (row + 1) / 2;
                // The last row may be partial; centre it on what it holds.
                let row_len = (row + 1).min(cup_count - row_start);
                let offset = (row_len as f32 - 1.0) / 2.0;
                Position::new(col as f32 - offset, row as f32)
            })
            .collect(),
    }
}
