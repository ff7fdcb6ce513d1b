//! AI players driving whole rounds.

use tien_len::ai::{ai_choose, hint, AIWeights, Difficulty, OnePly, Personality, Selector};
use tien_len::cards::parse_cards;
use tien_len::core::{Action, GameRng, HouseRules, PlayerId, PlayerMap};
use tien_len::games::tien_len::{apply_play, new_round, round_from_hands, TienLen};
use tien_len::rules::{Combination, RulesEngine};

/// Four different personalities finish a round without rule errors.
#[test]
fn test_mixed_table_finishes() {
    let engine = TienLen::default();
    let seats = PlayerMap::from_vec(Personality::ALL.to_vec());

    for seed in 0..5 {
        let mut state = engine.new_round(4, seed).unwrap();
        let mut rng = GameRng::new(seed).for_context("selector");
        let mut steps = 0;

        while engine.is_terminal(&state).is_none() {
            let player = state.current_player();
            let personality = seats[player];
            let action = Selector::for_personality(personality)
                .choose(&state, player, &personality.weights(), &mut rng)
                .unwrap();
            state = engine.apply_action(&state, player, &action).unwrap();
            steps += 1;
            assert!(steps < 2_000);
        }

        let result = engine.is_terminal(&state).unwrap();
        assert_eq!(result.finish_order.len(), 4);
    }
}

#[test]
fn test_lookahead_table_finishes() {
    let engine = TienLen::default();
    let mut state = engine.new_round(3, 17).unwrap();
    let mut rng = GameRng::new(17);
    let weights = Personality::Balanced.weights();

    while engine.is_terminal(&state).is_none() {
        let player = state.current_player();
        let action = ai_choose(&state, player, &weights, true, &mut rng).unwrap();
        state = engine.apply_action(&state, player, &action).unwrap();
    }
    assert!(state.is_round_over());
}

#[test]
fn test_same_seed_same_choice() {
    let state = new_round(4, HouseRules::default(), 99).unwrap();
    let player = state.current_player();
    let weights = Personality::Balanced.weights();

    let a = ai_choose(&state, player, &weights, false, &mut GameRng::new(4)).unwrap();
    let b = ai_choose(&state, player, &weights, false, &mut GameRng::new(4)).unwrap();
    assert_eq!(a, b);
}

/// Aggressive sheds its 2 at once; defensive answers low and keeps it.
#[test]
fn test_aggressive_and_defensive_diverge() {
    let state = round_from_hands(
        vec![
            parse_cards("3♠ 8♥ 9♥ J♦ K♦ A♦").unwrap(),
            parse_cards("10♠ 2♥ 4♣ 7♦ Q♠").unwrap(),
        ],
        HouseRules::default(),
    )
    .unwrap();
    let state = apply_play(&state, PlayerId::new(0), &parse_cards("3♠").unwrap()).unwrap();
    let player = PlayerId::new(1);

    let choose = |personality: Personality| {
        Selector::new(personality.selector_config().with_bluff_chance(0.0))
            .choose(&state, player, &personality.weights(), &mut GameRng::new(0))
            .unwrap()
    };
    assert_ne!(choose(Personality::Aggressive), choose(Personality::Defensive));
}

/// Every difficulty plays a short three-handed round to the end.
#[test]
fn test_every_difficulty_finishes_a_round() {
    let hands = ["3♠ 5♦ 7♣ 9♥ J♠ K♦", "4♣ 6♥ 8♦ 10♣ Q♥ A♠", "3♦ 5♠ 7♥ 9♣ J♦ 2♠"];
    let engine = TienLen::default();
    let weights = Personality::Balanced.weights();

    for (seed, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let mut state = round_from_hands(
            hands.iter().map(|h| parse_cards(h).unwrap()).collect(),
            HouseRules::default(),
        )
        .unwrap();
        let selector = Selector::for_level(Personality::Balanced, difficulty, HouseRules::default());
        let mut rng = GameRng::new(seed as u64);
        let mut steps = 0;

        while engine.is_terminal(&state).is_none() {
            let player = state.current_player();
            let action = selector.choose(&state, player, &weights, &mut rng).unwrap();
            state = engine.apply_action(&state, player, &action).unwrap();
            steps += 1;
            assert!(steps < 500, "{difficulty} round did not finish");
        }
        assert_eq!(state.finish_order().len(), 3);
    }
}

#[test]
fn test_easy_spreads_its_choices() {
    let state = round_from_hands(
        vec![
            parse_cards("3♠ 8♥ 9♥ J♦ K♦ A♦").unwrap(),
            parse_cards("10♠ 2♥ 4♣ 7♦ Q♠").unwrap(),
        ],
        HouseRules::default(),
    )
    .unwrap();
    let state = apply_play(&state, PlayerId::new(0), &parse_cards("3♠").unwrap()).unwrap();
    let selector = Selector::for_level(Personality::Balanced, Difficulty::Easy, HouseRules::default());
    let weights = Personality::Balanced.weights();
    let mut rng = GameRng::new(13);

    let picks: std::collections::HashSet<Action> = (0..40)
        .map(|_| selector.choose(&state, PlayerId::new(1), &weights, &mut rng).unwrap())
        .collect();
    assert!(picks.len() >= 3);
    assert!(!picks.contains(&Action::Pass));
}

#[test]
fn test_custom_lookahead_weight() {
    let state = new_round(2, HouseRules::default(), 12).unwrap();
    let player = state.current_player();
    let selector = Selector::for_personality(Personality::Balanced)
        .with_lookahead(OnePly::new(TienLen::default()).with_reply_weight(0.5));

    let scored = selector.score_moves(
        &state,
        player,
        &AIWeights::default(),
        tien_len::games::tien_len::legal_moves(&state, player).collect::<Vec<Combination>>(),
    );
    assert!(!scored.is_empty());
    assert!(scored.iter().all(|m| m.lookahead <= 0.0 && m.lookahead >= -0.5));
}

#[test]
fn test_hint_is_playable() {
    let state = new_round(4, HouseRules::default(), 5).unwrap();
    let player = state.current_player();
    let suggestion = hint(&state, player).unwrap();
    let next = apply_play(&state, player, suggestion.cards()).unwrap();
    assert_eq!(next.history()[0].action, Action::Play(suggestion));
}
