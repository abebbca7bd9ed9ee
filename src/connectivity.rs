use crate::grid::Grid;
use crate::union_find::UnionFind;

/// Epoch-tagged visited array backing the override split-detection DFS.
///
/// A single increment of `epoch` reinterprets the whole `visited` buffer
/// as freshly cleared, so a sequence of passes run during one override
/// attempt never pays the cost of re-zeroing a buffer sized for the
/// whole board.
#[derive(Clone, Debug)]
pub struct Relabeler {
    visited: Vec<u64>,
    epoch: u64,
    stack: Vec<usize>,
}

impl Relabeler {
    pub fn new(num_cells: usize) -> Self {
        Relabeler {
            visited: vec![0; num_cells],
            epoch: 1,
            stack: Vec::new(),
        }
    }

    /// The epoch a cell was last touched under; `0` if no pass has ever
    /// visited it.
    pub fn epoch_at(&self, idx: usize) -> u64 {
        self.visited[idx]
    }

    /// Runs one DFS pass over the 4-connected cells owned by `owner`
    /// reachable from `start`, relabeling every visited cell's
    /// union-find entry to `root` and rebuilding `root`'s rank to match
    /// the pass's visit count. Returns the epoch this pass ran under, so
    /// the caller can recognize a cell a *later* pass in the same
    /// override attempt would otherwise revisit.
    pub fn run_pass(
        &mut self,
        grid: &Grid,
        uf: &mut UnionFind,
        owner: u32,
        start: usize,
        root: usize,
    ) -> u64 {
        self.epoch += 1;
        uf.set_parent(root, root);
        uf.set_rank(root, 1);

        self.stack.clear();
        self.stack.push(start);
        while let Some(idx) = self.stack.pop() {
            if self.visited[idx] == self.epoch {
                continue;
            }
            self.visited[idx] = self.epoch;
            uf.set_parent(idx, root);
            uf.set_rank(root, uf.rank(root) + 1);

            let (x, y) = grid.coords(idx);
            for neighbor in grid.neighbor_indices(x, y) {
                if self.visited[neighbor] != self.epoch && grid.owner(neighbor) == owner {
                    self.stack.push(neighbor);
                }
            }
        }
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(grid: &mut Grid, owner: u32, x: u32, y: u32) {
        let idx = grid.index(x, y);
        grid.set_owner(idx, owner);
    }

    #[test]
    fn single_cell_pass_visits_only_itself() {
        let mut grid = Grid::new(3, 3);
        claim(&mut grid, 1, 1, 1);
        let mut uf = UnionFind::new(9);
        let mut relabeler = Relabeler::new(9);
        let start = grid.index(1, 1);
        relabeler.run_pass(&grid, &mut uf, 1, start, start);
        assert_eq!(uf.find(start), start);
    }

    #[test]
    fn pass_merges_a_connected_line() {
        let mut grid = Grid::new(5, 1);
        for x in 0..5 {
            claim(&mut grid, 1, x, 0);
        }
        let mut uf = UnionFind::new(5);
        let mut relabeler = Relabeler::new(5);
        let start = grid.index(0, 0);
        relabeler.run_pass(&grid, &mut uf, 1, start, start);
        for x in 1..5 {
            assert_eq!(uf.find(grid.index(x, 0)), uf.find(start));
        }
    }

    #[test]
    fn pass_does_not_cross_into_other_owners() {
        let mut grid = Grid::new(3, 1);
        claim(&mut grid, 1, 0, 0);
        claim(&mut grid, 2, 1, 0);
        claim(&mut grid, 1, 2, 0);
        let mut uf = UnionFind::new(3);
        let mut relabeler = Relabeler::new(3);
        let start = grid.index(0, 0);
        relabeler.run_pass(&grid, &mut uf, 1, start, start);
        assert_eq!(uf.find(start), start);
        assert_ne!(uf.find(grid.index(2, 0)), start);
    }

    #[test]
    fn later_pass_skips_cells_already_tagged_this_epoch() {
        let mut grid = Grid::new(3, 1);
        for x in 0..3 {
            claim(&mut grid, 1, x, 0);
        }
        let mut uf = UnionFind::new(3);
        let mut relabeler = Relabeler::new(3);
        let start = grid.index(0, 0);
        let epoch = relabeler.run_pass(&grid, &mut uf, 1, start, start);
        let middle = grid.index(1, 0);
        assert_eq!(relabeler.epoch_at(middle), epoch);
    }
}
