//! Property-based tests over randomized sequences of claims and
//! overrides, checked against the invariants any legal game must
//! satisfy, independent of the internals that enforce them.

use quickcheck_macros::quickcheck;

use crate::config::GameConfig;
use crate::game::Game;
use crate::player::PlayerId;

const WIDTH: u32 = 6;
const HEIGHT: u32 = 6;
const PLAYERS: u32 = 3;
const MAX_AREAS: u32 = 4;

fn owner_grid(game: &Game) -> Vec<Vec<PlayerId>> {
    (0..HEIGHT)
        .map(|y| (0..WIDTH).map(|x| game.owner_at(x, y)).collect())
        .collect()
}

fn flood_fill_component_count(grid: &[Vec<PlayerId>], player: PlayerId) -> u32 {
    let height = grid.len();
    let width = grid[0].len();
    let mut visited = vec![vec![false; width]; height];
    let mut components = 0;
    for y in 0..height {
        for x in 0..width {
            if grid[y][x] != player || visited[y][x] {
                continue;
            }
            components += 1;
            let mut stack = vec![(x, y)];
            while let Some((cx, cy)) = stack.pop() {
                if visited[cy][cx] {
                    continue;
                }
                visited[cy][cx] = true;
                for (dx, dy) in [(-1i64, 0i64), (1, 0), (0, -1), (0, 1)] {
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    if nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height {
                        let (nx, ny) = (nx as usize, ny as usize);
                        if !visited[ny][nx] && grid[ny][nx] == player {
                            stack.push((nx, ny));
                        }
                    }
                }
            }
        }
    }
    components
}

/// Turns an arbitrary `u32` seed into a bounded sequence of moves: a
/// player, in-bounds coordinates, and whether to spend an override
/// instead of an ordinary claim.
fn moves_from_seed(seed: &[u32]) -> Vec<(PlayerId, u32, u32, bool)> {
    seed.chunks_exact(4)
        .take(200)
        .map(|chunk| {
            let p = chunk[0] % PLAYERS + 1;
            let x = chunk[1] % WIDTH;
            let y = chunk[2] % HEIGHT;
            let is_override = chunk[3] % 5 == 0;
            (p, x, y, is_override)
        })
        .collect()
}

fn play(game: &mut Game, moves: &[(PlayerId, u32, u32, bool)]) {
    for &(p, x, y, is_override) in moves {
        if is_override {
            game.override_move(p, x, y);
        } else {
            game.claim(p, x, y);
        }
    }
}

#[quickcheck]
fn component_counts_never_exceed_the_cap(seed: Vec<u32>) -> bool {
    let mut game = Game::new(GameConfig::new(WIDTH, HEIGHT, PLAYERS, MAX_AREAS).unwrap());
    play(&mut game, &moves_from_seed(&seed));
    let grid = owner_grid(&game);
    (1..=PLAYERS).all(|p| flood_fill_component_count(&grid, p) <= MAX_AREAS)
}

#[quickcheck]
fn busy_and_free_partition_the_board(seed: Vec<u32>) -> bool {
    let mut game = Game::new(GameConfig::new(WIDTH, HEIGHT, PLAYERS, MAX_AREAS).unwrap());
    play(&mut game, &moves_from_seed(&seed));
    let busy: u64 = (1..=PLAYERS).map(|p| game.busy_fields(p)).sum();
    busy + game.all_free_fields() == WIDTH as u64 * HEIGHT as u64
}

#[quickcheck]
fn override_is_spent_at_most_once(seed: Vec<u32>) -> bool {
    let mut game = Game::new(GameConfig::new(WIDTH, HEIGHT, PLAYERS, MAX_AREAS).unwrap());
    let mut used = vec![false; PLAYERS as usize + 1];
    for (p, x, y, is_override) in moves_from_seed(&seed) {
        if is_override {
            if game.override_move(p, x, y) {
                if used[p as usize] {
                    return false;
                }
                used[p as usize] = true;
            }
        } else {
            game.claim(p, x, y);
        }
    }
    (1..=PLAYERS).all(|p| !used[p as usize] || !game.override_possible(p))
}

#[quickcheck]
fn rejected_claim_from_an_invalid_player_is_a_no_op(seed: Vec<u32>) -> bool {
    let mut game = Game::new(GameConfig::new(WIDTH, HEIGHT, PLAYERS, MAX_AREAS).unwrap());
    play(&mut game, &moves_from_seed(&seed));

    let before = owner_grid(&game);
    let busy_before: Vec<u64> = (1..=PLAYERS).map(|p| game.busy_fields(p)).collect();

    let accepted = game.claim(PLAYERS + 1, 0, 0);

    !accepted && before == owner_grid(&game) && busy_before == (1..=PLAYERS).map(|p| game.busy_fields(p)).collect::<Vec<_>>()
}

#[quickcheck]
fn render_length_matches_owner_grid(seed: Vec<u32>) -> bool {
    let mut game = Game::new(GameConfig::new(WIDTH, HEIGHT, PLAYERS, MAX_AREAS).unwrap());
    play(&mut game, &moves_from_seed(&seed));

    let mut expected_len = HEIGHT as usize;
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let owner = game.owner_at(x, y);
            expected_len += if owner == 0 {
                1
            } else if owner < 10 {
                1
            } else {
                owner.to_string().len() + 2
            };
        }
    }
    game.render().len() == expected_len
}
