//! The cross-session reroll request flow.
//!
//! The requester's session drives everything: validate the message,
//! enumerate characters whose owners could be asked, let the requester
//! pick one, call the owner's session over the remote channel, and on
//! acceptance spend the point and replace the roll. The owner's session
//! only ever answers a confirmation dialog.
//!
//! Nothing in here aborts the host. Transport trouble (offline target,
//! timeout, closed channel) counts as a decline; real failures bubble
//! up to the hook layer, which turns them into notifications.

use std::sync::Arc;

use fp_api::{
    ActorId, ActorKind, DialogPrompt, HostContext, HostError, MessageId, OwnershipLevel,
    PromptAnswer, RemoteFuture, RemoteHandler, UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModuleResult;
use crate::resource::{FriendPoints, FriendPointsStore};
use crate::{reroll, settings};

/// Remote method the flow calls on the target owner's session.
pub const REMOTE_METHOD: &str = "friend-points.request";

/// Ownership a user needs on a character to be asked for its points.
pub const OWNERSHIP_THRESHOLD: OwnershipLevel = OwnershipLevel::Owner;

/// How a reroll request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The owner spent a point and the roll was replaced.
    Accepted,
    /// The owner declined, did not answer in time, or could not be
    /// reached.
    Declined,
    /// The requester backed out before anyone was asked.
    Cancelled,
}

/// A character the requester may ask for a point, paired with its one
/// connected owner.
#[derive(Debug, Clone)]
pub struct EligibleTarget {
    /// The character holding the points.
    pub actor: ActorId,
    /// Character display name.
    pub name: String,
    /// The connected owner who would be asked.
    pub owner: UserId,
    /// Owner display name.
    pub owner_name: String,
    /// Points the character currently holds.
    pub points: FriendPoints,
}

/// Wire payload of one reroll request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerollRequest {
    /// Localized prompt text shown to the owner.
    pub prompt: String,
    /// The user asking for the reroll.
    pub requester: UserId,
    /// The character whose point would be spent.
    pub target_actor: ActorId,
    /// The roll message to replace.
    pub message: MessageId,
}

/// Characters the requester may currently ask for a Friend Point.
///
/// A character qualifies when it is a player character with points
/// left and, the requester aside, exactly one connected user owns it.
/// Zero connected owners means nobody can answer; more than one means
/// it is unclear who should.
pub async fn eligible_targets(ctx: &HostContext) -> ModuleResult<Vec<EligibleTarget>> {
    let active = ctx.users.active_users();
    let mut targets = Vec::new();
    for actor in ctx.actors.list().await? {
        if actor.kind != ActorKind::Character {
            continue;
        }
        let Some(points) = FriendPointsStore::read(&actor) else {
            continue;
        };
        if points.is_empty() {
            continue;
        }
        let mut owners = active.iter().filter(|user| {
            user.id != ctx.user && actor.ownership_level(user.id) >= OWNERSHIP_THRESHOLD
        });
        let (Some(owner), None) = (owners.next(), owners.next()) else {
            continue;
        };
        targets.push(EligibleTarget {
            actor: actor.id,
            name: actor.name.clone(),
            owner: owner.id,
            owner_name: owner.name.clone(),
            points,
        });
    }
    Ok(targets)
}

/// Drive one reroll request end to end for a posted roll message.
pub async fn request_reroll(
    ctx: &HostContext,
    message_id: MessageId,
) -> ModuleResult<RequestOutcome> {
    // Nobody gets asked to spend a point on an unrerollable message.
    let message = ctx.chat.get(message_id).await?;
    reroll::validate(&message)?;

    let targets = eligible_targets(ctx).await?;
    if targets.is_empty() {
        ctx.dialogs
            .inform(
                &ctx.i18n.localize("FRIENDPOINTS.NoTargetsTitle"),
                &ctx.i18n.localize("FRIENDPOINTS.NoTargetsBody"),
            )
            .await?;
        return Ok(RequestOutcome::Cancelled);
    }

    let options: Vec<String> = targets
        .iter()
        .map(|target| {
            let value = target.points.value.to_string();
            ctx.i18n.format(
                "FRIENDPOINTS.TargetOption",
                &[
                    ("actor", target.name.as_str()),
                    ("owner", target.owner_name.as_str()),
                    ("value", value.as_str()),
                ],
            )
        })
        .collect();
    let Some(pick) = ctx
        .dialogs
        .choose(&ctx.i18n.localize("FRIENDPOINTS.ChooseTargetTitle"), &options)
        .await?
    else {
        tracing::debug!("target chooser dismissed");
        return Ok(RequestOutcome::Cancelled);
    };
    let Some(target) = targets.get(pick) else {
        tracing::warn!(pick, "chooser returned an out-of-range index");
        return Ok(RequestOutcome::Cancelled);
    };

    let requester_name = ctx
        .current_user()
        .map(|user| user.name)
        .unwrap_or_else(|| ctx.user.to_string());
    let request = RerollRequest {
        prompt: ctx.i18n.format(
            "FRIENDPOINTS.RequestBody",
            &[
                ("requester", requester_name.as_str()),
                ("target", target.name.as_str()),
            ],
        ),
        requester: ctx.user,
        target_actor: target.actor,
        message: message_id,
    };

    let timeout = settings::request_timeout(ctx.settings.as_ref());
    tracing::info!(actor = %target.actor, owner = %target.owner, ?timeout, "sending reroll request");
    let reply = match ctx
        .remote
        .invoke(
            target.owner,
            REMOTE_METHOD,
            serde_json::to_value(&request)?,
            timeout,
        )
        .await
    {
        Ok(reply) => reply,
        Err(err) => {
            // Transport trouble is an implicit decline, never a crash.
            tracing::warn!(%err, owner = %target.owner, "reroll request did not complete");
            ctx.notify.warn(&ctx.i18n.format(
                "FRIENDPOINTS.RequestFailed",
                &[("owner", target.owner_name.as_str())],
            ));
            return Ok(RequestOutcome::Declined);
        }
    };

    let answer = match serde_json::from_value::<PromptAnswer>(reply) {
        Ok(answer) => answer,
        Err(err) => {
            tracing::warn!(%err, "malformed reply to reroll request; treating as decline");
            PromptAnswer::Dismissed
        }
    };
    if answer != PromptAnswer::Accepted {
        tracing::info!(owner = %target.owner, ?answer, "reroll request declined");
        ctx.notify.info(&ctx.i18n.format(
            "FRIENDPOINTS.RequestDeclined",
            &[("owner", target.owner_name.as_str())],
        ));
        return Ok(RequestOutcome::Declined);
    }

    let store = FriendPointsStore::new(ctx);
    let points = store.adjust(target.actor, -1).await?;
    tracing::info!(actor = %target.actor, left = points.value, "Friend Point spent");
    reroll::reroll_and_replace(ctx, message_id).await?;
    ctx.notify.info(&ctx.i18n.format(
        "FRIENDPOINTS.RequestAccepted",
        &[("owner", target.owner_name.as_str())],
    ));
    Ok(RequestOutcome::Accepted)
}

/// The handler a session registers under [`REMOTE_METHOD`]. Shows the
/// owner a localized confirmation dialog and replies with the answer;
/// dismissal travels back as an answer like any other.
pub fn remote_handler(ctx: &HostContext) -> RemoteHandler {
    let ctx = ctx.clone();
    Arc::new(move |payload: Value| -> RemoteFuture {
        let ctx = ctx.clone();
        Box::pin(async move {
            let request: RerollRequest = serde_json::from_value(payload)
                .map_err(|err| HostError::Remote(format!("malformed reroll request: {err}")))?;
            tracing::debug!(
                requester = %request.requester,
                actor = %request.target_actor,
                message = %request.message,
                "reroll request received"
            );
            let prompt = DialogPrompt::new(
                ctx.i18n.localize("FRIENDPOINTS.RequestTitle"),
                request.prompt,
            )
            .with_labels(
                ctx.i18n.localize("FRIENDPOINTS.Accept"),
                ctx.i18n.localize("FRIENDPOINTS.Decline"),
            );
            let answer = ctx.dialogs.confirm(&prompt).await?;
            tracing::debug!(?answer, "reroll request answered");
            serde_json::to_value(answer).map_err(|err| HostError::Remote(err.to_string()))
        })
    })
}
