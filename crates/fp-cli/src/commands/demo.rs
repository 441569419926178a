//! `fp demo`: a scripted two-player session, end to end.
//!
//! Alice owns Kael and banks two Friend Points by clicking pips. Bren
//! posts a poor climb check for Yara and asks Alice for a point via
//! the chat context menu. Alice's scripted answer decides whether the
//! die is rerolled. Everything the host observed can be dumped as a
//! JSON transcript.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use fp_api::{
    Actor, ActorId, ActorKind, ChatMessage, Die, MessageDraft, OwnershipLevel, Roll, SheetCommand,
    Speaker, User, UserRole,
};
use fp_module::{
    FriendPoints, FriendPointsModule, FriendPointsStore, MENU_REQUEST_REROLL, MODULE_ID, settings,
    sheet,
};
use fp_sandbox::{DialogScript, NotifyLevel, Sandbox};

use crate::Answer;

/// Drive the whole request flow and print what happened.
pub async fn run(
    seed: u64,
    answer: Answer,
    timeout_secs: u64,
    transcript: Option<&Path>,
    verbose: bool,
) -> Result<(), String> {
    if verbose {
        init_tracing();
    }

    let owner_script = match answer {
        Answer::Accept => DialogScript::AcceptAll,
        Answer::Decline => DialogScript::DeclineAll,
        Answer::Ignore => DialogScript::Ignore,
    };

    let alice = User::new("Alice", UserRole::Player);
    let bren = User::new("Bren", UserRole::Player);
    let (alice_id, bren_id) = (alice.id, bren.id);
    let kael = Actor::new("Kael", ActorKind::Character).with_owner(alice_id, OwnershipLevel::Owner);
    let yara = Actor::new("Yara", ActorKind::Character).with_owner(bren_id, OwnershipLevel::Owner);
    let (kael_id, yara_id) = (kael.id, yara.id);

    // Bren's own dialogs auto-accept so the target chooser picks the
    // only candidate; Alice answers per the --answer flag.
    let sandbox = Sandbox::builder()
        .with_seed(seed)
        .with_user(alice)
        .with_user(bren)
        .with_actor(kael)
        .with_actor(yara)
        .with_script(alice_id, owner_script)
        .with_script(bren_id, DialogScript::AcceptAll)
        .build();
    sandbox.install(Arc::new(FriendPointsModule::new()));

    println!(
        "  {} {}",
        "Friend Points demo".bold(),
        format!("(seed {seed}, answer {}, timeout {timeout_secs}s)", answer.label()).dimmed()
    );
    println!();

    sandbox.connect(alice_id).await.map_err(|e| e.to_string())?;
    let bren_ctx = sandbox.connect(bren_id).await.map_err(|e| e.to_string())?;
    bren_ctx
        .settings
        .set(
            MODULE_ID,
            settings::SETTING_REQUEST_TIMEOUT,
            serde_json::json!(timeout_secs),
        )
        .map_err(|e| e.to_string())?;

    // Alice banks two points by clicking Kael's pips.
    for _ in 0..2 {
        sandbox
            .activate(
                alice_id,
                &SheetCommand::new(MODULE_ID, sheet::ACTION_INCREMENT, kael_id),
            )
            .await
            .map_err(|e| e.to_string())?;
    }
    let store = FriendPointsStore::new(&bren_ctx);
    print_points(&store, kael_id, "Kael's pool after two pip clicks").await?;
    println!();

    // Bren rolls poorly and reaches for the context menu.
    let original = sandbox
        .post_message(
            MessageDraft::new(bren_id)
                .with_speaker(Speaker::for_actor(yara_id, "Yara"))
                .with_flavor("Climb check")
                .with_roll(Roll::single(Die::D20, 3, 2)),
        )
        .await
        .map_err(|e| e.to_string())?;
    println!(
        "  {} posts a climb check: {}",
        "Bren".cyan(),
        "1d20+2 = 5".yellow()
    );

    let entries = sandbox.menu_entries_for(&original);
    if !entries.iter().any(|e| e.id == MENU_REQUEST_REROLL) {
        return Err("no reroll entry offered on a fresh roll message".into());
    }
    println!(
        "  {} picks {} on the roll",
        "Bren".cyan(),
        "Request Friend Point Reroll".bold()
    );
    println!();
    sandbox
        .pick_menu_entry(bren_id, MENU_REQUEST_REROLL, original.id)
        .await
        .map_err(|e| e.to_string())?;

    println!("  {}", "Chat Log".bold().underline());
    println!();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Speaker", "Flavor", "Dice", "Total"]);
    for message in sandbox.chat_log().await {
        table.add_row(message_row(&message));
    }
    println!("{table}");
    println!();

    println!("  {}", "Notifications".bold().underline());
    println!();
    let notes = sandbox.notifications_for(bren_id);
    if notes.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (level, text) in notes {
        let tag = match level {
            NotifyLevel::Info => "info".green().bold(),
            NotifyLevel::Warn => "warn".yellow().bold(),
            NotifyLevel::Error => "error".red().bold(),
        };
        println!("  {tag}  {text}");
    }
    println!();

    print_points(&store, kael_id, "Kael's pool now").await?;

    if let Some(path) = transcript {
        let json = serde_json::to_string_pretty(&sandbox.events()).map_err(|e| e.to_string())?;
        std::fs::write(path, json).map_err(|e| format!("writing {}: {e}", path.display()))?;
        println!();
        println!("  Event transcript written to {}", path.display());
    }

    Ok(())
}

async fn print_points(
    store: &FriendPointsStore,
    actor: ActorId,
    label: &str,
) -> Result<(), String> {
    let points = store
        .get(actor)
        .await
        .map_err(|e| e.to_string())?
        .unwrap_or_else(|| FriendPoints::new(0));
    println!("  {label}: {}", super::pip_row(points));
    Ok(())
}

fn message_row(message: &ChatMessage) -> Vec<String> {
    let speaker = message
        .speaker
        .alias
        .clone()
        .unwrap_or_else(|| "(no speaker)".to_string());
    let flavor = message.flavor.clone().unwrap_or_default();
    let (dice, total) = match message.first_roll() {
        Some(roll) => (describe_dice(roll), roll.total().to_string()),
        None => (String::new(), String::new()),
    };
    vec![speaker, flavor, dice, total]
}

fn describe_dice(roll: &Roll) -> String {
    let mut parts = Vec::new();
    for term in &roll.terms {
        for result in &term.results {
            if result.discarded {
                parts.push(format!("{} (discarded)", result.value));
            } else {
                parts.push(result.value.to_string());
            }
        }
    }
    parts.join(", ")
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fp_module=debug,fp_sandbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
