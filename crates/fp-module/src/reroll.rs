//! Rerolling a posted roll message.
//!
//! Chat messages are immutable, so a reroll is a replacement: roll a
//! fresh die of the same denomination, compose a new message showing
//! the discarded result next to the new one, create it, then delete
//! the original. Creation comes first so a failure in between leaves
//! both messages visible instead of losing the roll.

use fp_api::{ChatMessage, DieResult, DieTerm, HostContext, MessageDraft, MessageId, Roll};
use serde_json::json;

use crate::MODULE_ID;
use crate::error::{ModuleError, ModuleResult};

/// Template the roll fragments are rendered with.
pub const TEMPLATE_PATH: &str = "modules/friend-points/templates/roll-fragment.hbs";
/// Source of the roll fragment template, registered during init.
pub const TEMPLATE_SOURCE: &str = "<div class=\"dice-roll {{state}}\">\
<span class=\"formula\">{{formula}}</span>\
<span class=\"result\">{{value}}</span>\
</div>";

/// Message flag naming the message a replacement was rerolled from.
pub const REROLLED_FROM_FLAG: &str = "rerolled-from";
/// Message flag recording the discarded face value.
pub const REPLACED_VALUE_FLAG: &str = "replaced-value";

/// Check that a message holds a rerollable roll: roll data present, a
/// die term with exactly one result, and that result not already
/// discarded. Returns the roll, term, and result for the caller.
pub fn validate(message: &ChatMessage) -> ModuleResult<(&Roll, &DieTerm, &DieResult)> {
    let roll = message
        .first_roll()
        .ok_or(ModuleError::NoRollData(message.id))?;
    let term = roll
        .terms
        .first()
        .ok_or(ModuleError::NoDieTerms(message.id))?;
    let result = term
        .results
        .first()
        .ok_or(ModuleError::NoResults(message.id))?;
    if term.results.len() > 1 {
        return Err(ModuleError::MultipleResults(message.id));
    }
    if result.discarded {
        return Err(ModuleError::AlreadyDiscarded(message.id));
    }
    Ok((roll, term, result))
}

/// Reroll a message's die and post the replacement in its place.
///
/// The replacement keeps the original's speaker, carries both the
/// discarded and the fresh result, and is flagged with the original's
/// id so it can never be rerolled again.
pub async fn reroll_and_replace(
    ctx: &HostContext,
    message_id: MessageId,
) -> ModuleResult<ChatMessage> {
    let original = ctx.chat.get(message_id).await?;
    let (roll, term, result) = validate(&original)?;

    let die = term.die;
    let old_value = result.value;
    let new_value = ctx.dice.roll(die);
    tracing::debug!(message = %message_id, %die, old = old_value, new = new_value, "rerolling");

    let old_fragment = ctx
        .templates
        .render(
            TEMPLATE_PATH,
            &json!({
                "state": "discarded",
                "formula": roll.formula(),
                "value": old_value,
            }),
        )
        .await?;
    let new_fragment = ctx
        .templates
        .render(
            TEMPLATE_PATH,
            &json!({
                "state": "rerolled",
                "formula": format!("1{die}"),
                "value": new_value,
            }),
        )
        .await?;

    let mut terms = roll.terms.clone();
    terms[0] = DieTerm {
        die,
        results: vec![DieResult::discarded(old_value), DieResult::new(new_value)],
    };
    let replacement_roll = Roll::new(terms, roll.modifier);

    let prefix = ctx.i18n.localize("FRIENDPOINTS.RerollFlavorPrefix");
    let flavor = match &original.flavor {
        Some(flavor) => format!("{prefix} {flavor}"),
        None => prefix,
    };

    let draft = MessageDraft::new(ctx.user)
        .with_speaker(original.speaker.clone())
        .with_content(format!("{old_fragment}\n{new_fragment}"))
        .with_flavor(flavor)
        .with_roll(replacement_roll)
        .with_flag(MODULE_ID, REROLLED_FROM_FLAG, json!(original.id))
        .with_flag(MODULE_ID, REPLACED_VALUE_FLAG, json!(old_value));

    let replacement = ctx.chat.create(draft).await?;
    ctx.chat.delete(original.id).await?;
    tracing::info!(original = %original.id, replacement = %replacement.id, "roll message replaced");
    Ok(replacement)
}
