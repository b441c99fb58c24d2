use alloc::vec::Vec;
use ndarray::Array2;
use smallvec::SmallVec;

use super::*;

/// Uniform mine scatter that keeps a designated cell and its whole
/// neighborhood clear of mines, so the first click never detonates and
/// usually opens a zero region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatterGenerator {
    seed: u64,
    safe_cell: Pos,
}

impl ScatterGenerator {
    pub const fn new(seed: u64, safe_cell: Pos) -> Self {
        Self { seed, safe_cell }
    }
}

impl MinefieldGenerator for ScatterGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        use rand::prelude::*;

        let (rows, cols) = config.size;
        let mut mine_mask: Array2<bool> = Array2::default(config.size.to_grid_index());

        let mut forbidden: SmallVec<[Pos; 9]> = SmallVec::new();
        forbidden.push(self.safe_cell);
        forbidden.extend(mine_mask.iter_neighbors(self.safe_cell));

        // every cell outside the safe neighborhood is a candidate
        let mut pool: Vec<Pos> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (row, col)))
            .filter(|pos| !forbidden.contains(pos))
            .collect();

        let requested = usize::from(config.mines);
        if requested > pool.len() {
            log::warn!(
                "mine pool too small after clearing the start neighborhood, placing {} of {} requested",
                pool.len(),
                requested
            );
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for _ in 0..requested.min(pool.len()) {
            let pick = rng.random_range(0..pool.len());
            let pos = pool.swap_remove(pick);
            mine_mask[pos.to_grid_index()] = true;
        }

        Minefield::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_same_field() {
        let config = GameConfig::new((9, 9), 10);
        let first = ScatterGenerator::new(7, (4, 4)).generate(config);
        let second = ScatterGenerator::new(7, (4, 4)).generate(config);
        assert_eq!(first, second);
    }

    #[test]
    fn places_exactly_the_requested_count() {
        let config = GameConfig::new((16, 30), 99);
        for seed in 0..8 {
            let field = ScatterGenerator::new(seed, (8, 15)).generate(config);
            assert_eq!(field.mine_count(), 99);
        }
    }

    #[test]
    fn safe_neighborhood_stays_clear() {
        let config = GameConfig::new((9, 9), 10);
        for seed in 0..32 {
            let field = ScatterGenerator::new(seed, (4, 4)).generate(config);
            for row in 3..=5 {
                for col in 3..=5 {
                    assert!(!field.contains_mine((row, col)));
                }
            }
        }
    }

    #[test]
    fn exhausted_pool_places_what_fits() {
        // forbidden set covers the whole 3x3 grid, nothing can be placed
        let config = GameConfig::new((3, 3), 8);
        let field = ScatterGenerator::new(1, (1, 1)).generate(config);
        assert_eq!(field.mine_count(), 0);

        // only the 16 cells outside the safe neighborhood can hold mines
        let config = GameConfig::new((5, 5), 24);
        let field = ScatterGenerator::new(1, (2, 2)).generate(config);
        assert_eq!(field.mine_count(), 16);
    }
}
