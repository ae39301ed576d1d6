//! # Gusts
//!
//! Loads an optional JSON config, then traces each group's horizontal force
//! as the wind alternates. Pass `--clamp <limit>` to bound the drift.
//!
//! Run with: `cargo run --example gusts -- [config.json] [--clamp 0.5]`

use snowfall::prelude::*;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut config = SnowConfig::default();
    let mut clamp = None;

    while let Some(arg) = args.next() {
        if arg == "--clamp" {
            clamp = args.next().and_then(|s| s.parse::<f32>().ok());
        } else {
            config = match SnowConfig::load(&arg) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Failed to load {}: {}", arg, e);
                    std::process::exit(1);
                }
            };
        }
    }
    if let Some(limit) = clamp {
        config = config.with_max_drift(limit);
    }

    let bounds = Vec2::new(800.0, 600.0);
    let mut view = match SnowView::with_config(bounds, NullCanvas, config.with_autostart(true)) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut last_fires = 0;
    while view.now() < Duration::from_secs(10) {
        view.step(1.0 / 60.0);
        let fires = view.wind().fires();
        if fires != last_fires {
            last_fires = fires;
            println!(
                "{:>6.2}s gust #{:<3} A dx={:+.2} B dx={:+.2} flakes={}",
                view.now().as_secs_f32(),
                fires,
                view.group(GroupId::A).direction().x,
                view.group(GroupId::B).direction().x,
                view.population(),
            );
        }
    }
}
