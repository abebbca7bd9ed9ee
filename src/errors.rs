use thiserror::Error;

/// Failure modes reachable from construction-time validation.
///
/// Ordinary gameplay rejections (an out-of-range player, a move that
/// would blow the area cap, claiming an already-owned cell, ...) are not
/// represented here — they are reported as `bool` from `Game::claim` and
/// `Game::override_move`, matching the host contract in the design notes.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("board dimensions, player count, and area cap must all be nonzero (got width={width}, height={height}, players={players}, max_areas={max_areas})")]
    InvalidDimensions {
        width: u32,
        height: u32,
        players: u32,
        max_areas: u32,
    },
}
