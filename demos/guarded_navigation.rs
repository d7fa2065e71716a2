//! Guarded Navigation
//!
//! This example demonstrates an in-memory history whose navigations pass
//! through before-hooks.
//!
//! Key concepts:
//! - Listeners see the current location immediately, then every commit
//! - A before-hook can block a navigation or ask the user to confirm it
//! - A blocked back/forward move is undone on the native stack
//! - A basename scopes every route under a prefix
//!
//! Run with: cargo run --example guarded_navigation

use waypoint::{Action, HistoryBuilder, HookResult, MemoryAdapter, Navigator};

fn main() {
    println!("=== Guarded Navigation Example ===\n");

    // The user answers "yes" to every prompt except the one about leaving drafts
    let adapter = MemoryAdapter::new().with_user_confirmation(|message, answer| {
        println!("  confirm: {message}");
        answer(!message.contains("draft"))
    });

    let history = HistoryBuilder::new()
        .adapter(adapter)
        .basename("/app")
        .build_with_basename()
        .unwrap();

    let _listener = history.listen(|location| {
        println!(
            "  now at {} ({}, basename {:?})",
            location.pathname,
            location.action,
            location.basename.as_deref().unwrap_or("")
        );
    });

    let _guard = history.listen_before(|location, _| {
        if location.pathname.starts_with("/admin") {
            HookResult::Block
        } else if location.pathname == "/compose" {
            HookResult::Prompt("Start composing?".to_string())
        } else if location.action == Action::Pop {
            HookResult::Prompt("Discard your draft?".to_string())
        } else {
            HookResult::Allow
        }
    });

    println!("\nPushing /inbox");
    history.push("/inbox").unwrap();

    println!("\nPushing /admin (blocked)");
    let blocked = history.push("/admin").unwrap();
    println!("  status: {:?}", blocked.status());

    println!("\nPushing /compose (confirmed)");
    history.push("/compose").unwrap();

    println!("\nGoing back (declined, stack restored)");
    history.go_back().unwrap();
    println!("  native moves: {:?}", history.inner().adapter().go_calls());
    println!("  still at {}", history.current_location().pathname);

    println!("\nhref for /settings: {}", history.create_href("/settings"));

    println!("\n=== Example Complete ===");
}
