use crate::*;
pub use scatter::*;

mod scatter;

pub trait MinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield;
}
