use std::sync::Arc;

use backend::domain::prompt::CANNED_QUESTION;
use backend::domain::MessageKind;
use backend::errors::domain::ConflictKind;
use backend::AppError;

use crate::support::factory::{load_game, playing_game};
use crate::support::scripted_ai::ScriptedGenerator;
use crate::support::test_state::TestEnv;

#[tokio::test]
async fn help_suggests_a_question_and_spends_a_hint() -> Result<(), AppError> {
    let ai = Arc::new(ScriptedGenerator::new(["\"What's your hometown like?\""]));
    let env = TestEnv::with_ai(ai.clone()).await?;
    let g = playing_game(&env).await?;
    let (alice, alice_bot) = g.alice;

    let help = env.games.request_help(g.game.id, alice).await?;
    assert_eq!(help.kind, MessageKind::Question);
    assert_eq!(help.text, "What's your hometown like?");
    assert_eq!(help.help_remaining, 2);

    let game = load_game(&env.db, g.game.id).await?;
    assert_eq!(game.bot(alice_bot).unwrap().help_count, 2);
    assert_eq!(ai.prompts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn help_runs_out_after_three_uses() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let (alice, _) = g.alice;

    for remaining in [2, 1, 0] {
        let help = env.games.request_help(g.game.id, alice).await?;
        assert_eq!(help.help_remaining, remaining);
        assert_eq!(help.text, CANNED_QUESTION);
    }
    let err = env.games.request_help(g.game.id, alice).await.unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::HelpExhausted));
    Ok(())
}

#[tokio::test]
async fn help_is_only_for_the_bot_due_to_act() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let (alice, _) = g.alice;
    let (bob, bob_bot) = g.bob;

    let err = env.games.request_help(g.game.id, bob).await.unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::OutOfTurn));

    env.games
        .send_message(g.game.id, alice, "Any siblings?", Some(bob_bot))
        .await?;
    let help = env.games.request_help(g.game.id, bob).await?;
    assert_eq!(help.kind, MessageKind::Answer);

    let game = load_game(&env.db, g.game.id).await?;
    assert_eq!(game.bot(bob_bot).unwrap().help_count, 2);
    Ok(())
}
