//! Prompts for the text generator, built from the conversation so far.

use std::fmt::Write as _;

use crate::domain::game::{Bot, Game, Message};
use crate::domain::state::MessageKind;

/// Used when the generator fails or returns nothing usable.
pub const CANNED_QUESTION: &str = "What is something you did today that surprised you?";
pub const CANNED_ANSWER: &str = "Honestly, I'd have to think about that one for a while.";

/// Most recent messages included in a prompt.
const HISTORY_LIMIT: usize = 20;

pub fn canned_text(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Question => CANNED_QUESTION,
        MessageKind::Answer => CANNED_ANSWER,
    }
}

fn bot_name(game: &Game, bot_id: i64) -> &str {
    game.find_bot(bot_id).map(|b| b.name.as_str()).unwrap_or("someone")
}

fn write_history(out: &mut String, game: &Game, history: &[Message]) {
    let start = history.len().saturating_sub(HISTORY_LIMIT);
    let recent = &history[start..];
    if recent.is_empty() {
        out.push_str("No one has spoken yet.\n");
        return;
    }
    out.push_str("Conversation so far:\n");
    for message in recent {
        let _ = match message.kind {
            MessageKind::Question => writeln!(
                out,
                "{} asked {}: {}",
                bot_name(game, message.source_bot_id),
                bot_name(game, message.target_bot_id),
                message.text
            ),
            MessageKind::Answer => writeln!(
                out,
                "{} answered: {}",
                bot_name(game, message.source_bot_id),
                message.text
            ),
        };
    }
}

fn preamble(me: &Bot) -> String {
    format!(
        "You are {}, one of five players in a chat game. Some players are people and some are \
         AIs; people win by spotting the AIs. Sound like a relaxed person texting: short, casual, \
         no emojis, never mention being an AI.\n",
        me.name
    )
}

/// Prompt for `me` asking `target` a question.
pub fn question_prompt(game: &Game, me: &Bot, target: &Bot, history: &[Message]) -> String {
    let mut out = preamble(me);
    write_history(&mut out, game, history);
    let _ = writeln!(
        out,
        "Write one short question for {}. Reply with the question only.",
        target.name
    );
    out
}

/// Prompt for `me` answering `question`.
pub fn answer_prompt(game: &Game, me: &Bot, question: &str, history: &[Message]) -> String {
    let mut out = preamble(me);
    write_history(&mut out, game, history);
    let _ = writeln!(
        out,
        "You were asked: \"{question}\". Reply with your answer only, one or two sentences."
    );
    out
}

/// Prompt suggesting a move to a human player asking for help.
pub fn help_prompt(game: &Game, me: &Bot, kind: MessageKind, history: &[Message]) -> String {
    let mut out = format!(
        "You are coaching {}, a person in a chat game who must seem human and spot the AIs.\n",
        me.name
    );
    write_history(&mut out, game, history);
    match (kind, game.last_question.as_deref()) {
        (MessageKind::Answer, Some(question)) => {
            let _ = writeln!(
                out,
                "Suggest a natural answer to \"{question}\". Reply with the answer only."
            );
        }
        _ => {
            out.push_str(
                "Suggest one question likely to expose an AI. Reply with the question only.\n",
            );
        }
    }
    out
}
