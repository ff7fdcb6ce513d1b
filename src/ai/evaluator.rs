//! Neutral move scoring shared by every personality.

use crate::core::GameState;
use crate::rules::Combination;

use super::features::Features;
use super::weights::Factor;

/// Scores a candidate move for the current player in `[0, 1]`.
///
/// The base score is a fixed convex combination of the factors: shed
/// cards, keep bombs, holdouts and runs, play low, and answer pressure.
#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluator;

impl Evaluator {
    const FINISH: f64 = 0.35;
    const KEEP_BOMBS: f64 = 0.15;
    const HOLDOUTS: f64 = 0.15;
    const SEQUENCES: f64 = 0.15;
    const PLAY_LOW: f64 = 0.10;
    const PRESSURE: f64 = 0.10;

    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Base score from precomputed factors.
    #[must_use]
    pub fn base(&self, features: &Features) -> f64 {
        Self::FINISH * features[Factor::FinishPriority]
            + Self::KEEP_BOMBS * (1.0 - features[Factor::BombRisk])
            + Self::HOLDOUTS * features[Factor::DefenseHoldouts]
            + Self::SEQUENCES * features[Factor::SequenceValue]
            + Self::PLAY_LOW * (1.0 - features[Factor::LeadAggression])
            + Self::PRESSURE * features[Factor::OpponentPressure]
    }

    #[must_use]
    pub fn score(&self, state: &GameState, combo: &Combination) -> f64 {
        self.base(&Features::compute(state, combo))
    }

    /// Best-scoring combination, first on ties.
    #[must_use]
    pub fn best<'a>(&self, state: &GameState, moves: &'a [Combination]) -> Option<(&'a Combination, f64)> {
        moves
            .iter()
            .map(|combo| (combo, self.score(state, combo)))
            .fold(None, |best, (combo, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((combo, score)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::core::HouseRules;
    use crate::games::tien_len::{legal_moves, round_from_hands};

    fn state(hands: &[&str]) -> GameState {
        round_from_hands(
            hands.iter().map(|h| parse_cards(h).unwrap()).collect(),
            HouseRules::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_scores_are_bounded() {
        let s = state(&["3♠ 3♣ 4♦ 5♥ 6♠ A♠ 2♣", "7♥ 8♥ 9♥"]);
        let evaluator = Evaluator::new();
        let moves: Vec<_> = legal_moves(&s, s.current_player()).collect();
        assert!(!moves.is_empty());
        for combo in &moves {
            let score = evaluator.score(&s, combo);
            assert!((0.0..=1.0).contains(&score), "{combo} scored {score}");
        }
    }

    #[test]
    fn test_going_out_scores_highest() {
        let s = state(&["3♠ 4♦ 5♥", "7♥ 8♥ 9♥"]);
        let moves: Vec<_> = legal_moves(&s, s.current_player()).collect();
        let (best, _) = Evaluator::new().best(&s, &moves).unwrap();
        assert_eq!(best.len(), 3);
    }

    #[test]
    fn test_best_of_nothing() {
        let s = state(&["3♠", "7♥"]);
        assert!(Evaluator::new().best(&s, &[]).is_none());
    }
}
