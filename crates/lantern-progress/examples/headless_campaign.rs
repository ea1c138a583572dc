//! Headless campaign: plays the whole journey with the reference solvers.
//!
//! Walks from the intro to the ending, skipping the jug chapter to show a
//! completion without a gear, and prints each chapter's meter and the
//! progress events the controller raised along the way.
//!
//! Run with: `RUST_LOG=debug cargo run -p lantern-progress --example headless_campaign --features test-utils`

use lantern_core::session::Timings;
use lantern_core::test_utils::solve;
use lantern_progress::campaign::Campaign;
use lantern_progress::catalog::{Catalog, Companion};
use lantern_progress::store::MemoryStore;

fn main() {
    env_logger::init();

    let store = MemoryStore::new();
    let mut campaign = Campaign::new(
        Catalog::standard(),
        Box::new(store.clone()),
        Timings::default(),
        2024,
    );

    while !campaign.progression().is_ending() {
        let index = campaign.progression().current_index();
        let Some(session) = campaign.session() else {
            println!("[{index}] story text");
            campaign.continue_story();
            continue;
        };
        let kind = session.kind();

        if index == 2 {
            println!("[{index}] {kind}: skipped");
            campaign.skip_level();
        } else {
            if let Ok(hint) = campaign.use_skill(Companion::Dog) {
                println!("[{index}] {kind}: dog offers a {hint:?}");
            }
            let step = solve(&mut campaign);
            let meter = campaign.session().map(|s| s.meter());
            println!("[{index}] {kind}: {step:?}, meter {meter:?}");
        }

        for event in campaign.drain_events() {
            println!("      {event:?}");
        }
        if !campaign.progression().is_ending() {
            campaign.next_chapter();
        }
    }

    for event in campaign.drain_events() {
        println!("      {event:?}");
    }
    let rank = campaign.progression().rank();
    println!(
        "ending reached with {} gears: rank {}{}",
        campaign.progression().gear_count(),
        rank.label(),
        rank.title().map(|t| format!(" ({t})")).unwrap_or_default()
    );
    println!(
        "save record: {}",
        store.get(lantern_progress::save::SAVE_KEY).unwrap_or_default()
    );
}
