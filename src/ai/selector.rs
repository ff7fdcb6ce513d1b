//! Move selection.
//!
//! `final = base + Σ weight_i × factor_i + lookahead`, then a temperature
//! controlled pick. Followers pass when nothing clears the pass baseline,
//! or now and then on a bluff; leaders always play.

use tracing::debug;

use crate::core::{
    Action, GameRng, GameState, HouseRules, PlayerId, Result, RuleViolation, TienLenError,
};
use crate::games::tien_len::{legal_moves, TienLen};
use crate::rules::Combination;

use super::evaluator::Evaluator;
use super::features::Features;
use super::lookahead::{LookaheadPolicy, Minimax, NoLookahead, OnePly};
use super::weights::{AIWeights, Difficulty, Personality, SelectorConfig};

/// A candidate with its score breakdown.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMove {
    pub combination: Combination,
    pub features: Features,
    pub base: f64,
    pub bias: f64,
    pub lookahead: f64,
}

impl ScoredMove {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.base + self.bias + self.lookahead
    }
}

#[derive(Clone, Debug, Default)]
pub struct Selector<L = NoLookahead> {
    config: SelectorConfig,
    evaluator: Evaluator,
    lookahead: L,
}

impl Selector<NoLookahead> {
    #[must_use]
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            evaluator: Evaluator::new(),
            lookahead: NoLookahead,
        }
    }

    #[must_use]
    pub fn for_personality(personality: Personality) -> Self {
        Self::new(personality.selector_config())
    }
}

impl Selector<Box<dyn LookaheadPolicy>> {
    /// Selector for `personality` playing at `difficulty` under `rules`.
    #[must_use]
    pub fn for_level(personality: Personality, difficulty: Difficulty, rules: HouseRules) -> Self {
        let engine = TienLen::new(rules);
        let lookahead: Box<dyn LookaheadPolicy> = match difficulty {
            Difficulty::Easy | Difficulty::Normal => Box::new(NoLookahead),
            Difficulty::Hard => Box::new(OnePly::new(engine)),
            Difficulty::Expert | Difficulty::Master => {
                Box::new(Minimax::new(engine, difficulty.search_depth()))
            }
        };
        Selector::<NoLookahead>::new(difficulty.tune(personality.selector_config())).with_lookahead(lookahead)
    }
}

impl<L: LookaheadPolicy> Selector<L> {
    /// Swap in a lookahead strategy.
    pub fn with_lookahead<M: LookaheadPolicy>(self, lookahead: M) -> Selector<M> {
        Selector {
            config: self.config,
            evaluator: self.evaluator,
            lookahead,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Score every move for `player`, in the order given.
    pub fn score_moves(
        &self,
        state: &GameState,
        player: PlayerId,
        weights: &AIWeights,
        moves: Vec<Combination>,
    ) -> Vec<ScoredMove> {
        moves
            .into_iter()
            .map(|combination| {
                let features = Features::compute(state, &combination);
                let base = self.evaluator.base(&features);
                let bias = features.weighted(weights);
                let lookahead = self.lookahead.adjust(state, player, &combination, &self.evaluator);
                ScoredMove {
                    combination,
                    features,
                    base,
                    bias,
                    lookahead,
                }
            })
            .collect()
    }

    /// Pick an action for `player`, who must hold the turn.
    pub fn choose(
        &self,
        state: &GameState,
        player: PlayerId,
        weights: &AIWeights,
        rng: &mut GameRng,
    ) -> Result<Action> {
        check_turn(state, player)?;
        let leading = state.top().is_none();
        let moves: Vec<Combination> = legal_moves(state, player).collect();
        if moves.is_empty() {
            if leading {
                return Err(TienLenError::InvariantViolation(format!(
                    "{player} leads with no legal move"
                )));
            }
            debug!(%player, "no legal move, passing");
            return Ok(Action::Pass);
        }
        if !leading && rng.gen_bool(self.config.bluff_chance) {
            debug!(%player, chance = self.config.bluff_chance, "bluff pass");
            return Ok(Action::Pass);
        }

        let scored = self.score_moves(state, player, weights, moves);
        for candidate in &scored {
            debug!(
                %player,
                combination = %candidate.combination,
                base = candidate.base,
                bias = candidate.bias,
                lookahead = candidate.lookahead,
                "scored move"
            );
        }

        let best = scored
            .iter()
            .map(ScoredMove::total)
            .fold(f64::NEG_INFINITY, f64::max);
        if !leading && best < self.config.pass_baseline {
            debug!(%player, best, baseline = self.config.pass_baseline, "passing below baseline");
            return Ok(Action::Pass);
        }

        let index = self.pick(&scored, best, rng).unwrap_or(0);
        Ok(Action::Play(scored[index].combination.clone()))
    }

    fn pick(&self, scored: &[ScoredMove], best: f64, rng: &mut GameRng) -> Option<usize> {
        if self.config.temperature > 0.0 {
            let weights: Vec<f64> = scored
                .iter()
                .map(|m| ((m.total() - best) / self.config.temperature).exp())
                .collect();
            rng.choose_weighted(&weights)
        } else {
            let ties: Vec<usize> = scored
                .iter()
                .enumerate()
                .filter(|(_, m)| best - m.total() <= self.config.tie_epsilon)
                .map(|(i, _)| i)
                .collect();
            rng.choose(&ties).copied()
        }
    }
}

fn check_turn(state: &GameState, player: PlayerId) -> Result<()> {
    if !state.seats().contains(player) {
        return Err(TienLenError::UnknownPlayer(player));
    }
    if state.is_round_over() {
        return Err(RuleViolation::RoundOver.into());
    }
    if !state.is_active(player) {
        return Err(TienLenError::EmptyHandAction(player));
    }
    if state.current_player() != player {
        return Err(TienLenError::NotYourTurn {
            expected: state.current_player(),
            actual: player,
        });
    }
    Ok(())
}

/// Choose a play or pass for `player` with the default selector settings.
///
/// With `lookahead` the selector also weighs the next player's best reply.
pub fn ai_choose(
    state: &GameState,
    player: PlayerId,
    weights: &AIWeights,
    lookahead: bool,
    rng: &mut GameRng,
) -> Result<Action> {
    let selector = Selector::new(SelectorConfig::default());
    if lookahead {
        let engine = TienLen::new(*state.rules());
        selector
            .with_lookahead(OnePly::new(engine))
            .choose(state, player, weights, rng)
    } else {
        selector.choose(state, player, weights, rng)
    }
}

/// The neutral evaluator's favourite move, with no bias or sampling.
#[must_use]
pub fn hint(state: &GameState, player: PlayerId) -> Option<Combination> {
    let moves: Vec<Combination> = legal_moves(state, player).collect();
    Evaluator::new()
        .best(state, &moves)
        .map(|(combo, _)| combo.clone())
}
