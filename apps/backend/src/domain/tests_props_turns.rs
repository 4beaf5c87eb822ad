//! Property tests for turn rotation (pure domain, no DB).
//!
//! Properties tested:
//! - The shuffle always yields a permutation of the bot ids
//! - A question never moves the turn index
//! - An answer moves the index by exactly one, modulo the order length
//! - The index stays inside the turn order through any message sequence

use proptest::prelude::*;

use crate::domain::game::fixtures::{at_answer, at_question, new_game, with_humans};
use crate::domain::game::{BotId, NewMessage};
use crate::domain::test_prelude;
use crate::domain::transition::advance_after_message;
use crate::domain::turn_order::{next_question_target, shuffle_bot_ids, SeedSource};

fn human_seats() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::btree_set(0u8..5, 0..=5).prop_map(|s| s.into_iter().collect())
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: shuffle output is a permutation of its input
    #[test]
    fn prop_shuffle_is_permutation(seed in any::<u64>(), game_id in 1i64..10_000) {
        let ids: Vec<BotId> = vec![3, 9, 27, 81, 243];
        let mut shuffled = shuffle_bot_ids(&ids, &mut SeedSource::Fixed(seed).rng_for_game(game_id));
        shuffled.sort_unstable();
        prop_assert_eq!(shuffled, ids);
    }

    /// Property: a question keeps the turn index and targets the answer state
    #[test]
    fn prop_question_keeps_index(index in 0usize..5, asked in 0u64..20, seats in human_seats()) {
        let game = at_question(with_humans(new_game(), &seats), index);
        let source = game.turn_order[index];
        let target = next_question_target(&game, source, asked).unwrap();

        let change = advance_after_message(&game, &NewMessage::question(source, target, "q")).unwrap();
        prop_assert_eq!(change.current_turn_index, index);
        prop_assert!(change.state.is_answer_state());
        prop_assert_eq!(change.last_question_target_bot_id, Some(target));
    }

    /// Property: an answer advances the index by exactly one mod len
    #[test]
    fn prop_answer_advances_by_one(index in 0usize..5, target_seat in 0usize..5, seats in human_seats()) {
        let base = with_humans(new_game(), &seats);
        let target = base.turn_order[target_seat];
        let game = at_answer(base, index, target);

        let change = advance_after_message(&game, &NewMessage::answer(target, "a")).unwrap();
        prop_assert_eq!(change.current_turn_index, (index + 1) % 5);
        prop_assert!(change.state.is_question_state());
        prop_assert_eq!(change.last_question_target_bot_id, None);
    }

    /// Property: index stays in bounds across a full conversation
    #[test]
    fn prop_index_in_bounds(rounds in 1usize..30, seats in human_seats()) {
        let mut game = at_question(with_humans(new_game(), &seats), 0);
        for round in 0..rounds {
            let source = game.turn_order[game.current_turn_index];
            let target = next_question_target(&game, source, round as u64).unwrap();
            advance_after_message(&game, &NewMessage::question(source, target, "q"))
                .unwrap()
                .apply_to(&mut game);
            advance_after_message(&game, &NewMessage::answer(target, "a"))
                .unwrap()
                .apply_to(&mut game);
            prop_assert!(game.current_turn_index < game.turn_order.len());
            prop_assert!(game.check_invariants().is_ok());
        }
    }
}
