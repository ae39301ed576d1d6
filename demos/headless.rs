//! # Headless Snowfall
//!
//! Runs a snowfall for a minute of simulated time without drawing anything
//! and prints the population once per second.
//!
//! Run with: `RUST_LOG=snowfall=debug cargo run --example headless [seed]`

use snowfall::prelude::*;

fn main() {
    env_logger::init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let config = SnowConfig::default().with_autostart(false);
    let bounds = Vec2::new(375.0, 667.0);
    let rng = SnowRng::seeded(seed);
    let mut view = match SnowView::with_rng(bounds, MemoryCanvas::new(), config, rng) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    println!("=== Snowfall (seed {}) ===", seed);
    view.start();

    for second in 1..=60 {
        view.run_for(Duration::from_secs(1), 1.0 / 60.0);
        println!(
            "t={:>2}s  flakes={:>3}  A={:>3}  B={:>3}  gusts={:>3}",
            second,
            view.population(),
            view.group(GroupId::A).len(),
            view.group(GroupId::B).len(),
            view.wind().fires(),
        );
    }

    view.stop();
    println!("Stopped: {} flakes, {} timers pending", view.population(), view.pending_timers());
}
