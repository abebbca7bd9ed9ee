use std::fmt::Write as _;

use crate::grid::{Grid, FREE};

fn cell_width(owner: u32) -> usize {
    if owner == FREE {
        1
    } else {
        let digits = decimal_digits(owner);
        if digits == 1 {
            1
        } else {
            digits + 2
        }
    }
}

fn decimal_digits(mut n: u32) -> usize {
    if n == 0 {
        return 1;
    }
    let mut digits = 0;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits
}

/// Renders `grid` as a newline-terminated string, one line per row, the
/// highest `y` first. A free cell is `.`; a single-digit owner is its
/// digit; a multi-digit owner is the decimal id padded by one space on
/// each side.
pub fn render(grid: &Grid) -> String {
    let width = grid.width();
    let height = grid.height();

    let mut capacity = height as usize;
    for y in 0..height {
        for x in 0..width {
            capacity += cell_width(grid.owner_at(x, y));
        }
    }

    let mut out = String::with_capacity(capacity);
    for y in (0..height).rev() {
        for x in 0..width {
            let owner = grid.owner_at(x, y);
            if owner == FREE {
                out.push('.');
            } else if decimal_digits(owner) == 1 {
                let _ = write!(out, "{owner}");
            } else {
                let _ = write!(out, " {owner} ");
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(grid: &mut Grid, owner: u32, x: u32, y: u32) {
        let idx = grid.index(x, y);
        grid.set_owner(idx, owner);
    }

    #[test]
    fn empty_grid_renders_dots() {
        let grid = Grid::new(3, 2);
        assert_eq!(render(&grid), "...\n...\n");
    }

    #[test]
    fn top_row_is_highest_y() {
        let mut grid = Grid::new(2, 2);
        claim(&mut grid, 1, 0, 1);
        assert_eq!(render(&grid), "1.\n..\n");
    }

    #[test]
    fn multi_digit_owner_is_padded() {
        let mut grid = Grid::new(2, 1);
        claim(&mut grid, 22, 0, 0);
        assert_eq!(render(&grid), " 22 .\n");
    }

    #[test]
    fn length_matches_computed_capacity() {
        let mut grid = Grid::new(4, 4);
        claim(&mut grid, 1, 0, 0);
        claim(&mut grid, 22, 1, 0);
        let rendered = render(&grid);
        let expected_len: usize = (0..grid.height())
            .map(|y| {
                (0..grid.width())
                    .map(|x| cell_width(grid.owner_at(x, y)))
                    .sum::<usize>()
                    + 1
            })
            .sum();
        assert_eq!(rendered.len(), expected_len);
    }
}
