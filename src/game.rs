use arrayvec::ArrayVec;
use log::{debug, info, trace};

use crate::config::GameConfig;
use crate::connectivity::Relabeler;
use crate::grid::{Grid, FREE};
use crate::player::{PlayerId, PlayerTable};
use crate::union_find::UnionFind;

/// Outcome of speculatively removing a cell from its owner's territory,
/// before either committing an override or restoring the probed cell.
struct SplitProbe {
    /// Number of distinct components the owner's territory splits into
    /// once the probed cell is removed. Zero if the cell was a singleton.
    new_owner_components: u32,
    /// Whether the probed cell has a neighbor owned by the overriding
    /// player, independent of the probe itself.
    has_neighbor_overrider: bool,
}

/// Runtime state of one game: the owner grid, per-player bookkeeping,
/// and the union-find/DFS machinery behind component counting.
pub struct Game {
    config: GameConfig,
    grid: Grid,
    players: PlayerTable,
    uf: UnionFind,
    relabeler: Relabeler,
    busy_total: u64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        debug!(
            "new game: {}x{}, {} players, max_areas={}",
            config.width(),
            config.height(),
            config.players(),
            config.max_areas()
        );
        let num_cells = config.num_cells() as usize;
        Game {
            config,
            grid: Grid::new(config.width(), config.height()),
            players: PlayerTable::new(config.players()),
            uf: UnionFind::new(num_cells),
            relabeler: Relabeler::new(num_cells),
            busy_total: 0,
        }
    }

    fn count_owner_neighbors(&self, x: u32, y: u32, owner: PlayerId) -> u32 {
        self.grid
            .neighbor_indices(x, y)
            .iter()
            .filter(|&&n| self.grid.owner(n) == owner)
            .count() as u32
    }

    /// Claims a free cell for `p`. Rejects silently (returns `false`) on
    /// an invalid player, out-of-bounds coordinates, an already-owned
    /// cell, or a claim that would grow `p` past its area cap by
    /// starting a new component.
    pub fn claim(&mut self, p: PlayerId, x: u32, y: u32) -> bool {
        if !self.players.is_valid(p) {
            trace!("claim rejected: player {p} is not valid");
            return false;
        }
        if !self.grid.in_bounds(x, y) {
            trace!("claim rejected: ({x}, {y}) is out of bounds");
            return false;
        }
        if !self.grid.is_free(x, y) {
            trace!("claim rejected: ({x}, {y}) is already owned");
            return false;
        }

        let neighbors = self.grid.neighbor_indices(x, y);
        let has_own_neighbor = neighbors.iter().any(|&n| self.grid.owner(n) == p);
        if !has_own_neighbor && self.players.get(p).components >= self.config.max_areas() {
            trace!("claim rejected: player {p} is already at its area cap");
            return false;
        }

        let idx = self.grid.index(x, y);
        self.grid.set_owner(idx, p);
        self.players.get_mut(p).fields_owned += 1;
        self.busy_total += 1;

        for &n in &neighbors {
            if self.grid.owner(n) == FREE {
                let (nx, ny) = self.grid.coords(n);
                if self.count_owner_neighbors(nx, ny, p) == 1 {
                    self.players.get_mut(p).boundary_free += 1;
                }
            }
        }

        let mut decremented: ArrayVec<PlayerId, 4> = ArrayVec::new();
        for &n in &neighbors {
            let q = self.grid.owner(n);
            if q != FREE && !decremented.contains(&q) {
                decremented.push(q);
                self.players.get_mut(q).boundary_free -= 1;
            }
        }

        self.players.get_mut(p).components += 1;
        for &n in &neighbors {
            if self.grid.owner(n) == p && self.uf.find(idx) != self.uf.find(n) {
                self.uf.union(idx, n);
                self.players.get_mut(p).components -= 1;
            }
        }

        debug!("player {p} claimed ({x}, {y})");
        true
    }

    /// Speculatively vacates `idx` (owned by `owner`) and re-sweeps its
    /// same-owner neighbors, relabeling each resulting fragment to a
    /// distinct union-find root. Leaves the grid and union-find state in
    /// this intermediate, not-yet-resolved shape; the caller must follow
    /// up with either [`Game::commit_override`] or
    /// [`Game::restore_after_probe`].
    fn probe_split(
        &mut self,
        overrider: PlayerId,
        owner: PlayerId,
        idx: usize,
        x: u32,
        y: u32,
    ) -> SplitProbe {
        let neighbors = self.grid.neighbor_indices(x, y);
        let has_neighbor_overrider = neighbors.iter().any(|&n| self.grid.owner(n) == overrider);

        self.grid.set_owner(idx, FREE);

        let mut new_owner_components = 0u32;
        let mut pass_epochs: ArrayVec<u64, 4> = ArrayVec::new();
        for &n in &neighbors {
            if self.grid.owner(n) != owner {
                continue;
            }
            if pass_epochs.contains(&self.relabeler.epoch_at(n)) {
                continue;
            }
            let epoch = self.relabeler.run_pass(&self.grid, &mut self.uf, owner, n, n);
            pass_epochs.push(epoch);
            new_owner_components += 1;
        }

        SplitProbe {
            new_owner_components,
            has_neighbor_overrider,
        }
    }

    /// Undoes [`Game::probe_split`]: restores `owner` at `idx` and
    /// re-merges it with its same-owner neighbors, repairing whatever
    /// fragments the probe relabeled back into one component. Leaves
    /// `owner`'s recorded component count untouched, matching the fact
    /// that the probe never changed it.
    fn restore_after_probe(&mut self, owner: PlayerId, idx: usize, x: u32, y: u32) {
        self.grid.set_owner(idx, owner);
        self.uf.set_parent(idx, idx);
        self.uf.set_rank(idx, 1);
        for n in self.grid.neighbor_indices(x, y) {
            if self.grid.owner(n) == owner {
                self.uf.union(idx, n);
            }
        }
    }

    fn evaluate_override(
        &mut self,
        p: PlayerId,
        idx: usize,
        x: u32,
        y: u32,
    ) -> Option<(bool, SplitProbe)> {
        let owner = self.grid.owner(idx);
        if owner == FREE || owner == p {
            return None;
        }

        let probe = self.probe_split(p, owner, idx, x, y);
        let delta = probe.new_owner_components as i64 - 1;
        let owner_components_after = self.players.get(owner).components as i64 + delta;
        let owner_ok = owner_components_after <= self.config.max_areas() as i64;

        let p_components_after =
            self.players.get(p).components + if probe.has_neighbor_overrider { 0 } else { 1 };
        let p_ok = p_components_after <= self.config.max_areas();

        Some((owner_ok && p_ok, probe))
    }

    fn commit_override(
        &mut self,
        p: PlayerId,
        owner: PlayerId,
        idx: usize,
        x: u32,
        y: u32,
        probe: &SplitProbe,
    ) {
        let neighbors = self.grid.neighbor_indices(x, y);

        for &n in &neighbors {
            if self.grid.owner(n) == FREE {
                let (nx, ny) = self.grid.coords(n);
                if self.count_owner_neighbors(nx, ny, owner) == 0 {
                    self.players.get_mut(owner).boundary_free -= 1;
                }
            }
        }

        self.players.get_mut(p).fields_owned += 1;
        self.players.get_mut(owner).fields_owned -= 1;

        let delta = probe.new_owner_components as i64 - 1;
        let new_owner_components = self.players.get(owner).components as i64 + delta;
        self.players.get_mut(owner).components = new_owner_components as u32;

        self.grid.set_owner(idx, p);
        self.uf.set_parent(idx, idx);
        self.uf.set_rank(idx, 1);

        for &n in &neighbors {
            if self.grid.owner(n) == FREE {
                let (nx, ny) = self.grid.coords(n);
                if self.count_owner_neighbors(nx, ny, p) == 1 {
                    self.players.get_mut(p).boundary_free += 1;
                }
            }
        }

        self.players.get_mut(p).components += 1;
        for &n in &neighbors {
            if self.grid.owner(n) == p && self.uf.find(idx) != self.uf.find(n) {
                self.uf.union(idx, n);
                self.players.get_mut(p).components -= 1;
            }
        }

        self.players.get_mut(p).override_used = true;
    }

    /// Spends `p`'s one-time override on the cell at `(x, y)`, taking it
    /// from whichever opponent owns it. Rejects (without spending the
    /// override) on an invalid player, out-of-bounds coordinates, a
    /// free cell, a cell `p` already owns, a board with no opponent
    /// cells at all, or a move that would push either player's
    /// component count past its cap.
    pub fn override_move(&mut self, p: PlayerId, x: u32, y: u32) -> bool {
        if !self.players.is_valid(p) {
            trace!("override rejected: player {p} is not valid");
            return false;
        }
        if !self.grid.in_bounds(x, y) {
            trace!("override rejected: ({x}, {y}) is out of bounds");
            return false;
        }
        if self.players.get(p).override_used {
            trace!("override rejected: player {p} already spent its override");
            return false;
        }

        let idx = self.grid.index(x, y);
        let owner = self.grid.owner(idx);
        if owner == FREE {
            trace!("override rejected: ({x}, {y}) is free");
            return false;
        }
        if owner == p {
            trace!("override rejected: ({x}, {y}) already belongs to player {p}");
            return false;
        }
        if self.busy_total - self.players.get(p).fields_owned == 0 {
            trace!("override rejected: no opponent owns any cell");
            return false;
        }

        let (accept, probe) = self
            .evaluate_override(p, idx, x, y)
            .expect("owner and player checked above");

        if accept {
            self.commit_override(p, owner, idx, x, y, &probe);
            info!("player {p} overrode ({x}, {y}), previously owned by {owner}");
        } else {
            self.restore_after_probe(owner, idx, x, y);
            trace!("override rejected: would exceed an area cap");
        }
        accept
    }

    /// Whether `p` has an unspent override that could legally be played
    /// somewhere on the current board. Scans every opponent cell,
    /// probing and always restoring, stopping at the first cell that
    /// would be accepted.
    pub fn override_possible(&mut self, p: PlayerId) -> bool {
        if !self.players.is_valid(p) || self.players.get(p).override_used {
            return false;
        }
        if self.busy_total - self.players.get(p).fields_owned == 0 {
            return false;
        }

        let num_cells = self.config.num_cells() as usize;
        for idx in 0..num_cells {
            let owner = self.grid.owner(idx);
            if owner == FREE || owner == p {
                continue;
            }
            let (x, y) = self.grid.coords(idx);
            if let Some((accept, _probe)) = self.evaluate_override(p, idx, x, y) {
                self.restore_after_probe(owner, idx, x, y);
                if accept {
                    return true;
                }
            }
        }
        false
    }

    pub fn busy_fields(&self, p: PlayerId) -> u64 {
        if !self.players.is_valid(p) {
            return 0;
        }
        self.players.get(p).fields_owned
    }

    pub fn free_fields(&self, p: PlayerId) -> u64 {
        if !self.players.is_valid(p) {
            return 0;
        }
        if self.players.get(p).components == self.config.max_areas() {
            self.players.get(p).boundary_free
        } else {
            self.config.num_cells() - self.busy_total
        }
    }

    pub fn all_free_fields(&self) -> u64 {
        self.config.num_cells() - self.busy_total
    }

    pub fn owner_at(&self, x: u32, y: u32) -> PlayerId {
        self.grid.owner_at(x, y)
    }

    pub fn render(&self) -> String {
        crate::render::render(&self.grid)
    }
}
