use serde_derive::{Deserialize, Serialize};

use crate::errors::GameError;

/// Validated, immutable game parameters.
///
/// Kept separate from [`crate::game::Game`] so a host can describe a game
/// (load it from a file, accept it from a CLI) without touching any
/// mutable state, and so `Game::new` never has to re-check what this
/// constructor already guaranteed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    width: u32,
    height: u32,
    players: u32,
    max_areas: u32,
}

impl GameConfig {
    pub fn new(
        width: u32,
        height: u32,
        players: u32,
        max_areas: u32,
    ) -> Result<Self, GameError> {
        if width == 0 || height == 0 || players == 0 || max_areas == 0 {
            return Err(GameError::InvalidDimensions {
                width,
                height,
                players,
                max_areas,
            });
        }
        Ok(GameConfig {
            width,
            height,
            players,
            max_areas,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn players(&self) -> u32 {
        self.players
    }

    pub fn max_areas(&self) -> u32 {
        self.max_areas
    }

    /// Total number of cells, widened to 64 bits since `width * height`
    /// can overflow a `u32`.
    pub fn num_cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_width() {
        assert!(GameConfig::new(0, 10, 2, 3).is_err());
    }

    #[test]
    fn rejects_zero_height() {
        assert!(GameConfig::new(10, 0, 2, 3).is_err());
    }

    #[test]
    fn rejects_zero_players() {
        assert!(GameConfig::new(10, 10, 0, 3).is_err());
    }

    #[test]
    fn rejects_zero_max_areas() {
        assert!(GameConfig::new(10, 10, 2, 0).is_err());
    }

    #[test]
    fn accepts_valid_config() {
        let cfg = GameConfig::new(10, 10, 2, 3).unwrap();
        assert_eq!(cfg.num_cells(), 100);
    }
}
