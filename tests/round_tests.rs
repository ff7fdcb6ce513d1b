//! Round flow tests through the public interface.
//!
//! These drive whole rounds the way a host would: deal, ask for legal
//! moves, apply plays and passes, and check the state machine's
//! guarantees along the way.

use tien_len::cards::{parse_cards, Card, DECK_SIZE};
use tien_len::core::{Action, GameRng, HouseRules, Phase, PlayerId, RuleViolation, TienLenError};
use tien_len::games::tien_len::{apply_pass, apply_play, legal_moves, new_round, round_from_hands, undo_last, TienLen};
use tien_len::rules::{may_play, Combination, RulesEngine, Shape};

fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).unwrap()
}

fn combo(s: &str, rules: &HouseRules) -> Combination {
    Combination::try_new(&cards(s), rules).unwrap()
}

fn total_cards(state: &tien_len::GameState) -> usize {
    state.seats().values().map(|s| s.hand.len()).sum::<usize>() + state.discard().len()
}

/// Three passes after a lead in a 4-player game clear the pile and hand the
/// lead back to the player who made it.
#[test]
fn test_three_passes_return_lead() {
    for seed in 0..10 {
        let state = new_round(4, HouseRules::default(), seed).unwrap();
        let leader = state.current_player();
        let opening = legal_moves(&state, leader).next().unwrap();
        let mut state = apply_play(&state, leader, opening.cards()).unwrap();

        for _ in 0..3 {
            let player = state.current_player();
            assert_ne!(player, leader);
            state = apply_pass(&state, player).unwrap();
        }

        assert!(state.top().is_none());
        assert_eq!(state.phase(), Phase::AwaitingLead);
        assert_eq!(state.current_player(), leader);
    }
}

/// Hand `{3♠,3♣,3♦,4♠,5♠,6♠}` on an empty pile offers the triple and the
/// straight but no mixed four-card set.
#[test]
fn test_legal_moves_example() {
    let rules = HouseRules::default();
    let state = round_from_hands(vec![cards("3♠ 3♣ 3♦ 4♠ 5♠ 6♠"), cards("7♥ 8♥ 9♥")], rules).unwrap();
    let moves: Vec<_> = legal_moves(&state, PlayerId::new(0)).collect();

    assert!(moves.contains(&combo("3♠ 3♣ 3♦", &rules)));
    assert!(moves.iter().any(|m| m.shape() == Shape::Straight));
    assert!(!moves.iter().any(|m| m.cards() == cards("3♠ 3♣ 4♠ 5♠").as_slice()));

    // The straight 4-5-6 lacks the opening card, so only the engine-level
    // generator offers it
    let free: Vec<_> = tien_len::rules::legal_moves(state.hand(PlayerId::new(0)), None, &rules).collect();
    assert!(free.contains(&combo("4♠ 5♠ 6♠", &rules)));
}

#[test]
fn test_pair_examples() {
    let rules = HouseRules::default();
    let nines = combo("9♠ 9♣", &rules);
    assert!(may_play(Some(&nines), &combo("10♠ 10♣", &rules), &rules));
    assert!(!may_play(Some(&nines), &combo("K♠", &rules), &rules));
}

#[test]
fn test_bomb_on_two_examples() {
    for bomb_beats_two in [true, false] {
        let rules = HouseRules::default().with_bomb_beats_two(bomb_beats_two);
        let two = combo("2♥", &rules);
        assert!(may_play(Some(&two), &combo("5♠ 5♣ 5♦ 5♥", &rules), &rules));
    }
}

#[test]
fn test_bomb_on_bomb_without_hierarchy_fails() {
    let rules = HouseRules::default().with_bomb_hierarchy(false);
    let state = round_from_hands(
        vec![cards("3♠ 5♠ 5♣ 5♦ 5♥ K♦"), cards("9♠ 9♣ 9♦ 9♥ 10♥")],
        rules,
    )
    .unwrap();
    let state = apply_play(&state, PlayerId::new(0), &cards("3♠")).unwrap();
    let state = apply_play(&state, PlayerId::new(1), &cards("9♠ 9♣ 9♦ 9♥")).unwrap();
    let err = apply_play(&state, PlayerId::new(0), &cards("5♠ 5♣ 5♦ 5♥")).unwrap_err();
    assert_eq!(err, TienLenError::IllegalMove(RuleViolation::BombsIncomparable));
    assert_eq!(err.to_string(), "illegal move: bombs cannot beat bombs without the bomb hierarchy rule");
}

/// A table where one seat holds nothing would hand that seat the lead with
/// no way to play or pass, so it is refused at the deal.
#[test]
fn test_prearranged_round_needs_cards_in_every_hand() {
    let err = round_from_hands(vec![cards("3♠"), Vec::new(), cards("4♠ 5♥")], HouseRules::default())
        .unwrap_err();
    assert_eq!(err, TienLenError::EmptyDeal(PlayerId::new(1)));

    // The same table with a card for the middle seat plays out normally
    let engine = TienLen::default();
    let state = round_from_hands(vec![cards("3♠"), cards("6♦"), cards("4♠ 5♥")], HouseRules::default())
        .unwrap();
    let state = apply_play(&state, PlayerId::new(0), &cards("3♠")).unwrap();
    assert!(!state.is_round_over());
    let state = apply_pass(&state, PlayerId::new(1)).unwrap();
    let state = apply_pass(&state, PlayerId::new(2)).unwrap();
    assert_eq!(state.phase(), Phase::AwaitingLead);
    let leader = state.current_player();
    assert!(!state.hand(leader).is_empty());
    assert!(!engine.legal_actions(&state, leader).is_empty());
}

#[test]
fn test_rejected_action_leaves_state_untouched() {
    let state = new_round(3, HouseRules::default(), 8).unwrap();
    let before = state.clone();
    let other = state.current_player().next(3);
    assert!(matches!(
        apply_pass(&state, other),
        Err(TienLenError::NotYourTurn { .. })
    ));
    assert_eq!(state, before);
}

#[test]
fn test_undo_restores_previous_state() {
    let state = new_round(2, HouseRules::default(), 3).unwrap();
    let leader = state.current_player();
    let opening = legal_moves(&state, leader).next().unwrap();
    let played = apply_play(&state, leader, opening.cards()).unwrap();

    let undone = undo_last(&played).unwrap();
    assert_eq!(undone.hand(leader), state.hand(leader));
    assert_eq!(undone.current_player(), leader);
    assert!(undone.top().is_none());
}

/// Random legal play always keeps the deck partitioned and ends the round.
#[test]
fn test_random_rounds_finish() {
    let engine = TienLen::default();
    for players in 2..=4 {
        for seed in 0..5 {
            let mut state = engine.new_round(players, seed).unwrap();
            let mut rng = GameRng::new(seed).for_context("test");
            let mut steps = 0;

            while engine.is_terminal(&state).is_none() {
                let player = state.current_player();
                let actions = engine.legal_actions(&state, player);
                let action = rng.choose(&actions).cloned().unwrap();
                state = engine.apply_action(&state, player, &action).unwrap();

                assert_eq!(total_cards(&state), DECK_SIZE);
                state.check_accounting().unwrap();
                steps += 1;
                assert!(steps < 2_000, "round did not terminate");
            }

            let result = engine.is_terminal(&state).unwrap();
            assert_eq!(result.finish_order.len(), players);
            assert!(state.active_count() == 0);
            assert_eq!(state.history().len(), steps);
        }
    }
}

#[test]
fn test_history_records_passes() {
    let state = new_round(4, HouseRules::default(), 21).unwrap();
    let leader = state.current_player();
    let opening = legal_moves(&state, leader).next().unwrap();
    let state = apply_play(&state, leader, opening.cards()).unwrap();
    let follower = state.current_player();
    let state = apply_pass(&state, follower).unwrap();

    let last = state.history().back().unwrap();
    assert_eq!(last.player, follower);
    assert_eq!(last.action, Action::Pass);
    assert_eq!(last.sequence, 1);
    assert!(state.seat(follower).passed);
}
