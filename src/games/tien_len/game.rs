//! The round state machine.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::cards::{Card, Deck, Hand, Rank};
use crate::core::{
    Action, ActionRecord, GameRng, GameState, HouseRules, Phase, PlayerId, Result, RuleViolation,
    TienLenError,
};
use crate::rules::{self, check_play, Combination, RoundResult, RulesEngine};

/// Player counts a table supports.
pub const PLAYER_RANGE: std::ops::RangeInclusive<usize> = 2..=4;

/// Deal a fresh round: shuffle with `seed`, deal the whole deck
/// round-robin and give the lead to the holder of the lowest card.
pub fn new_round(players: usize, rules: HouseRules, seed: u64) -> Result<GameState> {
    if !PLAYER_RANGE.contains(&players) {
        return Err(TienLenError::InvalidPlayerCount(players));
    }
    let mut rng = GameRng::new(seed).for_context("deal");
    let hands = Deck::shuffled(&mut rng).deal(players);
    start_round(hands, rules, seed)
}

/// Start a round from prearranged hands (puzzles, tests, restored tables).
///
/// The lead goes to the holder of the lowest card dealt, and the first play
/// must include it. Every seat must be dealt at least one card.
pub fn round_from_hands(hands: Vec<Vec<Card>>, rules: HouseRules) -> Result<GameState> {
    if !PLAYER_RANGE.contains(&hands.len()) {
        return Err(TienLenError::InvalidPlayerCount(hands.len()));
    }
    start_round(hands, rules, 0)
}

fn start_round(hands: Vec<Vec<Card>>, rules: HouseRules, seed: u64) -> Result<GameState> {
    if let Some(seat) = hands.iter().position(Vec::is_empty) {
        return Err(TienLenError::EmptyDeal(PlayerId::new(seat as u8)));
    }
    let order = rules.card_order();
    let hands: Vec<Hand> = hands.into_iter().map(|cards| Hand::new(cards, order)).collect();

    let opening = hands
        .iter()
        .flat_map(|hand| hand.iter())
        .min_by_key(|&card| order.value(card))
        .ok_or_else(|| TienLenError::InvariantViolation("no cards dealt".to_string()))?;
    let leader = hands
        .iter()
        .position(|hand| hand.contains(opening))
        .map(|seat| PlayerId::new(seat as u8))
        .ok_or_else(|| TienLenError::InvariantViolation(format!("nobody holds {opening}")))?;

    for (seat, hand) in hands.iter().enumerate() {
        let groups = hand.rank_groups();
        for rank in Rank::ALL.iter().filter(|rank| groups[rank.index()].len() == 4) {
            debug!(player = seat, rank = rank.label(), "four of a kind dealt");
        }
    }

    let state = GameState::new(rules, hands, leader, opening, seed);
    state.check_accounting()?;
    info!(players = state.player_count(), seed, %leader, %opening, "round dealt");
    Ok(state)
}

/// Combinations `player` may play now. Empty when it is not their turn.
///
/// The first play of the round must include the opening card.
pub fn legal_moves(state: &GameState, player: PlayerId) -> impl Iterator<Item = Combination> + '_ {
    let can_act = !state.is_round_over() && state.current_player() == player && state.is_active(player);
    let opening = state.opening_card();
    can_act
        .then(|| rules::legal_moves(state.hand(player), state.top(), state.rules()))
        .into_iter()
        .flatten()
        .filter(move |combo| opening.map_or(true, |card| combo.contains(card)))
}

fn check_actor(state: &GameState, player: PlayerId) -> Result<()> {
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

/// Successor state linked back to `state` for one-level undo.
fn successor(state: &GameState) -> GameState {
    let mut previous = state.clone();
    previous.previous = None;
    let mut next = state.clone();
    next.previous = Some(Arc::new(previous));
    next
}

fn record(state: &mut GameState, player: PlayerId, action: Action) {
    let sequence = state.history.len() as u32;
    let trick = state.trick;
    state.history.push_back(ActionRecord::new(player, action, trick, sequence));
}

fn next_active_after(state: &GameState, player: PlayerId) -> Result<PlayerId> {
    state
        .next_active_after(player)
        .ok_or_else(|| TienLenError::InvariantViolation("no active player left".to_string()))
}

/// Play `cards` for `player`.
///
/// Fails without touching `state` if the cards are not held, do not form a
/// combination, skip the opening card or do not beat the pile.
pub fn apply_play(state: &GameState, player: PlayerId, cards: &[Card]) -> Result<GameState> {
    check_actor(state, player)?;
    if cards.is_empty() {
        return Err(RuleViolation::EmptyPlay.into());
    }
    let mut seen = FxHashSet::default();
    if let Some(&dup) = cards.iter().find(|&&card| !seen.insert(card)) {
        return Err(RuleViolation::DuplicateCard(dup).into());
    }
    if let Some(&missing) = cards.iter().find(|&&card| !state.hand(player).contains(card)) {
        return Err(RuleViolation::CardNotInHand(missing).into());
    }

    let combo = Combination::try_new(cards, state.rules())?;
    if let Some(opening) = state.opening_card() {
        if !combo.contains(opening) {
            return Err(RuleViolation::MissingOpeningCard(opening).into());
        }
    }
    check_play(state.top(), &combo, state.rules())?;

    let mut next = successor(state);
    {
        let seat = &mut next.seats[player];
        seat.hand
            .remove_cards(combo.cards())
            .map_err(RuleViolation::CardNotInHand)?;
        seat.passed = false;
    }
    next.discard.extend(combo.cards().iter().copied());
    next.pile.push(player, combo.clone());
    next.opening_card = None;
    next.passes = 0;
    next.phase = Phase::AwaitingFollow;

    if combo.is_bomb() {
        info!(%player, combination = %combo, "bomb played");
    } else {
        info!(%player, combination = %combo, "play");
    }
    record(&mut next, player, Action::Play(combo));

    if next.hand(player).is_empty() {
        finish(&mut next, player);
    }
    if !next.is_round_over() {
        next.current = next_active_after(&next, player)?;
    }
    next.check_accounting()?;
    Ok(next)
}

/// Pass for `player`. Leaders cannot pass.
///
/// When every active player other than the last to play has passed, the
/// trick clears and that player leads (or the next active player after
/// them, if they have gone out).
pub fn apply_pass(state: &GameState, player: PlayerId) -> Result<GameState> {
    check_actor(state, player)?;
    let Some(last) = state.last_player() else {
        return Err(RuleViolation::PassOnLead.into());
    };

    let mut next = successor(state);
    next.seats[player].passed = true;
    next.passes += 1;
    record(&mut next, player, Action::Pass);
    info!(%player, passes = next.passes, "pass");

    let last_active = next.is_active(last);
    let needed = next.active_count() - usize::from(last_active);
    if next.passes >= needed {
        next.pile.clear();
        next.passes = 0;
        for (_, seat) in next.seats.iter_mut() {
            seat.passed = false;
        }
        next.trick += 1;
        next.phase = Phase::AwaitingLead;
        next.current = if last_active { last } else { next_active_after(&next, last)? };
        info!(winner = %last, leader = %next.current, trick = next.trick, "trick cleared");
    } else {
        next.current = next_active_after(&next, player)?;
    }
    Ok(next)
}

/// Mark `player` out and end the round once at most one player holds cards.
fn finish(state: &mut GameState, player: PlayerId) {
    let place = state.finish_order.len();
    state.seats[player].place = Some(place);
    state.finish_order.push_back(player);
    info!(%player, place, "player finished");

    if state.active_count() <= 1 {
        let remaining: Vec<PlayerId> = state.active_players().collect();
        for last in remaining {
            let place = state.finish_order.len();
            state.seats[last].place = Some(place);
            state.finish_order.push_back(last);
        }
        state.phase = Phase::RoundOver;
        info!(finish_order = ?state.finish_order, "round over");
    }
}

/// The state before the last action, if any.
#[must_use]
pub fn undo_last(state: &GameState) -> Option<GameState> {
    state.previous().cloned()
}

/// Tiến Lên behind the [`RulesEngine`] seam.
#[derive(Clone, Debug, Default)]
pub struct TienLen {
    rules: HouseRules,
}

impl TienLen {
    #[must_use]
    pub fn new(rules: HouseRules) -> Self {
        Self { rules }
    }

    /// Deal a round under this engine's rules.
    pub fn new_round(&self, players: usize, seed: u64) -> Result<GameState> {
        new_round(players, self.rules, seed)
    }
}

impl RulesEngine for TienLen {
    fn rules(&self) -> &HouseRules {
        &self.rules
    }

    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        let mut actions: Vec<Action> = legal_moves(state, player).map(Action::Play).collect();
        let may_pass = state.phase() == Phase::AwaitingFollow
            && state.current_player() == player
            && state.is_active(player);
        if may_pass {
            actions.push(Action::Pass);
        }
        actions
    }

    fn apply_action(&self, state: &GameState, player: PlayerId, action: &Action) -> Result<GameState> {
        match action {
            Action::Play(combo) => apply_play(state, player, combo.cards()),
            Action::Pass => apply_pass(state, player),
        }
    }

    fn is_terminal(&self, state: &GameState) -> Option<RoundResult> {
        state.is_round_over().then(|| RoundResult {
            finish_order: state.finish_order().iter().copied().collect(),
        })
    }
}

/// Builder for a table.
#[derive(Clone, Debug)]
pub struct TienLenBuilder {
    player_count: usize,
    rules: HouseRules,
}

impl Default for TienLenBuilder {
    fn default() -> Self {
        Self {
            player_count: 4,
            rules: HouseRules::default(),
        }
    }
}

impl TienLenBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    pub fn rules(mut self, rules: HouseRules) -> Self {
        self.rules = rules;
        self
    }

    /// Build the engine and deal the first round.
    pub fn build(self, seed: u64) -> Result<(TienLen, GameState)> {
        let game = TienLen::new(self.rules);
        let state = game.new_round(self.player_count, seed)?;
        Ok((game, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn cards(s: &str) -> Vec<Card> {
        parse_cards(s).unwrap()
    }

    fn table(hands: &[&str]) -> GameState {
        round_from_hands(hands.iter().map(|h| cards(h)).collect(), HouseRules::default()).unwrap()
    }

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id)
    }

    #[test]
    fn test_new_round_deals_everything() {
        for players in 2..=4 {
            let state = new_round(players, HouseRules::default(), 42).unwrap();
            let total: usize = state.seats().values().map(|s| s.hand.len()).sum();
            assert_eq!(total, 52);
            assert!(state.hand(state.current_player()).contains(state.rules().card_order().lowest_card()));
            assert_eq!(state.phase(), Phase::AwaitingLead);
        }
    }

    #[test]
    fn test_new_round_is_deterministic() {
        let a = new_round(4, HouseRules::default(), 9).unwrap();
        let b = new_round(4, HouseRules::default(), 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_player_count() {
        assert_eq!(
            new_round(5, HouseRules::default(), 1).unwrap_err(),
            TienLenError::InvalidPlayerCount(5)
        );
        assert!(new_round(1, HouseRules::default(), 1).is_err());
    }

    #[test]
    fn test_seat_without_cards_is_rejected() {
        let err = round_from_hands(vec![cards("3♠"), vec![], cards("4♠ 5♥")], HouseRules::default())
            .unwrap_err();
        assert_eq!(err, TienLenError::EmptyDeal(p(1)));
        assert_eq!(err.to_string(), "Player 1 was dealt no cards");
    }

    #[test]
    fn test_flipped_suits_change_leader_card() {
        let rules = HouseRules::default().with_flipped_suits(true);
        let state = round_from_hands(vec![cards("3♠ 5♦"), cards("3♥ 9♣")], rules).unwrap();
        assert_eq!(state.current_player(), p(1));
        assert_eq!(state.opening_card(), Some(cards("3♥")[0]));
    }

    #[test]
    fn test_opening_must_include_lowest_card() {
        let state = table(&["3♠ 4♠ 5♠ 9♦", "6♣ 7♣ K♥ 2♥"]);
        assert_eq!(state.current_player(), p(0));

        let err = apply_play(&state, p(0), &cards("9♦")).unwrap_err();
        assert_eq!(
            err,
            TienLenError::IllegalMove(RuleViolation::MissingOpeningCard(cards("3♠")[0]))
        );
        assert!(legal_moves(&state, p(0)).all(|m| m.contains(cards("3♠")[0])));

        let next = apply_play(&state, p(0), &cards("3♠ 4♠ 5♠")).unwrap();
        assert_eq!(next.phase(), Phase::AwaitingFollow);
        assert_eq!(next.current_player(), p(1));
        assert_eq!(next.opening_card(), None);
    }

    #[test]
    fn test_turn_and_hand_errors() {
        let state = table(&["3♠ 9♦", "6♣ K♥"]);
        assert_eq!(
            apply_play(&state, p(1), &cards("6♣")).unwrap_err(),
            TienLenError::NotYourTurn { expected: p(0), actual: p(1) }
        );
        assert_eq!(
            apply_play(&state, p(0), &cards("3♠ 6♣")).unwrap_err(),
            TienLenError::IllegalMove(RuleViolation::CardNotInHand(cards("6♣")[0]))
        );
        assert_eq!(
            apply_play(&state, p(0), &cards("3♠ 9♦")).unwrap_err(),
            TienLenError::InvalidCombination { cards: cards("3♠ 9♦") }
        );
        assert_eq!(
            apply_play(&state, p(0), &[]).unwrap_err(),
            TienLenError::IllegalMove(RuleViolation::EmptyPlay)
        );
        assert_eq!(
            apply_pass(&state, p(0)).unwrap_err(),
            TienLenError::IllegalMove(RuleViolation::PassOnLead)
        );
        assert_eq!(
            apply_pass(&state, p(7)).unwrap_err(),
            TienLenError::UnknownPlayer(p(7))
        );
    }

    #[test]
    fn test_follow_must_beat_pile() {
        let state = table(&["3♠ 9♦", "3♣ K♥"]);
        let state = apply_play(&state, p(0), &cards("3♠")).unwrap();
        let state = apply_play(&state, p(1), &cards("K♥")).unwrap();
        let err = apply_play(&state, p(0), &cards("9♦")).unwrap_err();
        assert_eq!(err, TienLenError::IllegalMove(RuleViolation::NotHigher));
    }

    #[test]
    fn test_passes_clear_trick() {
        let state = table(&["3♠ 9♦ J♠", "4♣ 5♣ 2♥", "6♦ 7♦ 8♥", "3♥ 10♠ Q♦"]);
        let state = apply_play(&state, p(0), &cards("3♠")).unwrap();
        let state = apply_play(&state, p(1), &cards("2♥")).unwrap();
        let state = apply_pass(&state, p(2)).unwrap();
        let state = apply_pass(&state, p(3)).unwrap();
        assert_eq!(state.passes(), 2);
        assert_eq!(state.current_player(), p(0));
        let state = apply_pass(&state, p(0)).unwrap();

        assert!(state.top().is_none());
        assert_eq!(state.phase(), Phase::AwaitingLead);
        assert_eq!(state.current_player(), p(1));
        assert_eq!(state.trick(), 2);
        assert!(state.seats().values().all(|s| !s.passed));
    }

    #[test]
    fn test_lead_passes_on_when_winner_finished() {
        let state = table(&["3♠ 9♦", "2♥", "4♦ 5♣"]);
        let state = apply_play(&state, p(0), &cards("3♠")).unwrap();
        let state = apply_play(&state, p(1), &cards("2♥")).unwrap();
        assert_eq!(state.seat(p(1)).place, Some(0));
        assert_eq!(state.current_player(), p(2));

        let state = apply_pass(&state, p(2)).unwrap();
        assert_eq!(state.current_player(), p(0));
        let state = apply_pass(&state, p(0)).unwrap();
        assert_eq!(state.phase(), Phase::AwaitingLead);
        assert_eq!(state.current_player(), p(2));
    }

    #[test]
    fn test_round_ends_with_one_player_left() {
        let state = table(&["3♠", "4♣ 5♣"]);
        let state = apply_play(&state, p(0), &cards("3♠")).unwrap();
        assert!(state.is_round_over());
        assert_eq!(state.finish_order().iter().copied().collect::<Vec<_>>(), vec![p(0), p(1)]);
        assert_eq!(
            apply_pass(&state, p(1)).unwrap_err(),
            TienLenError::IllegalMove(RuleViolation::RoundOver)
        );

        let engine = TienLen::default();
        let result = engine.is_terminal(&state).unwrap();
        assert!(result.is_winner(p(0)));
        assert_eq!(state.round_points().unwrap()[p(0)], 1);
    }

    #[test]
    fn test_finished_player_cannot_act() {
        let state = table(&["3♠ 4♠", "2♥", "5♦ 6♦"]);
        let state = apply_play(&state, p(0), &cards("3♠")).unwrap();
        let state = apply_play(&state, p(1), &cards("2♥")).unwrap();
        assert_eq!(
            apply_pass(&state, p(1)).unwrap_err(),
            TienLenError::EmptyHandAction(p(1))
        );
    }

    #[test]
    fn test_undo_and_history() {
        let start = table(&["3♠ 9♦", "3♣ K♥"]);
        let played = apply_play(&start, p(0), &cards("3♠")).unwrap();
        assert_eq!(played.history().len(), 1);
        assert_eq!(played.history()[0].player, p(0));
        assert_eq!(played.history()[0].trick, 1);

        let undone = undo_last(&played).unwrap();
        assert_eq!(undone, start);
        assert!(undo_last(&start).is_none());
    }

    #[test]
    fn test_rules_engine_actions() {
        let engine = TienLen::default();
        let state = table(&["3♠ 9♦", "3♣ K♥"]);
        let lead = engine.legal_actions(&state, p(0));
        assert!(!lead.contains(&Action::Pass));
        assert!(engine.legal_actions(&state, p(1)).is_empty());

        let state = engine.apply_action(&state, p(0), &lead[0]).unwrap();
        let follow = engine.legal_actions(&state, p(1));
        assert_eq!(follow.last(), Some(&Action::Pass));
        assert!(engine.is_terminal(&state).is_none());
    }

    #[test]
    fn test_builder() {
        let (engine, state) = TienLenBuilder::new()
            .player_count(3)
            .rules(HouseRules::default().with_chain_cutting(true))
            .build(5)
            .unwrap();
        assert!(engine.rules().chain_cutting);
        assert_eq!(state.player_count(), 3);
        assert!(state.rules().chain_cutting);
    }
}
