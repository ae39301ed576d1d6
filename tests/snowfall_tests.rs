//! Integration tests for the snowfall lifecycle.
//!
//! These drive a full `SnowView` through simulated time with a seeded random
//! source and check the population rules end to end.

use snowfall::prelude::*;

const FRAME: f32 = 1.0 / 60.0;

fn bounds() -> Vec2 {
    Vec2::new(375.0, 667.0)
}

fn stopped_view(seed: u64) -> SnowView<MemoryCanvas> {
    SnowView::with_rng(
        bounds(),
        MemoryCanvas::new(),
        SnowConfig::default().with_autostart(false),
        SnowRng::seeded(seed),
    )
    .unwrap()
}

// ============================================================================
// Steady State
// ============================================================================

#[test]
fn test_sixty_seconds_converges_near_capacity() {
    let mut view = stopped_view(42);
    view.start();
    view.run_for(Duration::from_secs(60), FRAME);

    let population = view.population();
    assert!(
        (100..=150).contains(&population),
        "population after 60s: {}",
        population
    );
    assert!(view.flakes().iter().all(|f| (2..=4).contains(&f.size)));
}

#[test]
fn test_capacity_never_exceeded() {
    let config = SnowConfig::default().with_capacity(20).with_autostart(false);
    let mut view =
        SnowView::with_rng(bounds(), MemoryCanvas::new(), config, SnowRng::seeded(9)).unwrap();
    view.start();

    for _ in 0..(60 * 40) {
        view.step(FRAME);
        assert!(view.population() <= 20);
    }
    // Twenty flakes are reached well inside forty seconds
    assert_eq!(view.population(), 20);
}

#[test]
fn test_groups_partition_live_flakes() {
    let mut view = stopped_view(5);
    view.start();
    for _ in 0..(60 * 20) {
        view.step(FRAME);
        assert!(view.is_partitioned());
    }
    let a = view.group(GroupId::A).len();
    let b = view.group(GroupId::B).len();
    assert_eq!(a + b, view.population());
    assert!(a > 0 && b > 0);
}

#[test]
fn test_expiries_replace_flakes() {
    let mut view = stopped_view(77);
    view.start();
    view.run_for(Duration::from_secs(20), FRAME);

    // Every flake alive now was spawned less than six seconds ago
    let now = view.now();
    for flake in view.flakes() {
        assert!(flake.expires_at > now);
        assert!(flake.expires_at <= now + Duration::from_secs(6));
    }
    assert!(view.canvas().removed() > 0);
    assert_eq!(view.canvas().len(), view.population());
    // One expiry timer per flake, plus the wind
    assert_eq!(view.pending_timers(), view.population() + 1);
}

// ============================================================================
// Start / Stop
// ============================================================================

#[test]
fn test_double_start_matches_single_start() {
    let mut once = stopped_view(13);
    once.start();
    let mut twice = stopped_view(13);
    twice.start();
    twice.start();

    assert_eq!(once.pending_timers(), 1);
    assert_eq!(twice.pending_timers(), 1);

    once.run_for(Duration::from_secs(10), FRAME);
    twice.run_for(Duration::from_secs(10), FRAME);
    assert_eq!(once.population(), twice.population());
    assert_eq!(once.flakes(), twice.flakes());
}

#[test]
fn test_double_stop_is_noop() {
    let mut view = stopped_view(21);
    view.start();
    view.run_for(Duration::from_secs(5), FRAME);
    assert!(view.population() > 0);

    view.stop();
    assert_eq!(view.population(), 0);
    assert_eq!(view.pending_timers(), 0);
    assert!(view.canvas().is_empty());

    view.stop();
    assert!(!view.is_running());
    assert_eq!(view.population(), 0);
    assert_eq!(view.pending_timers(), 0);
}

#[test]
fn test_stopped_view_stays_empty() {
    let mut view = stopped_view(22);
    view.start();
    view.run_for(Duration::from_secs(3), FRAME);
    view.stop();

    view.run_for(Duration::from_secs(10), FRAME);
    assert_eq!(view.population(), 0);
    assert_eq!(view.pending_timers(), 0);
    assert!(!view.wind().is_armed());
}

#[test]
fn test_stop_then_start_ramps_again() {
    let mut view = stopped_view(31);
    view.start();
    view.run_for(Duration::from_secs(30), FRAME);
    view.stop();
    assert_eq!(view.population(), 0);

    view.start();
    assert_eq!(view.population(), 0);
    view.run_for(Duration::from_secs(60), FRAME);
    assert!((100..=150).contains(&view.population()));
    assert!(view.is_partitioned());
}

#[test]
fn test_stop_from_fresh_state() {
    let mut view = stopped_view(1);
    view.stop();
    assert!(!view.is_running());
    assert_eq!(view.pending_timers(), 0);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_configure_after_start_only_affects_new_flakes() {
    let mut view = stopped_view(8);
    view.start();
    view.run_for(Duration::from_secs(3), FRAME);
    let old: Vec<_> = view.flakes().iter().map(|f| f.id).collect();
    assert!(!old.is_empty());

    view.configure(5, 10);
    view.run_for(Duration::from_secs(1), FRAME);

    for flake in view.flakes() {
        if old.contains(&flake.id) {
            assert!((2..=4).contains(&flake.size));
        } else {
            assert!((5..=10).contains(&flake.size));
        }
    }
    assert!(view.flakes().len() > old.len());
}

#[test]
fn test_configure_inverted_swaps() {
    let mut view = stopped_view(2);
    view.configure(9, 6);
    assert_eq!(view.field().size_range(), (6, 9));
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("snowfall-config-{}.json", std::process::id()));
    let config = SnowConfig::default().with_capacity(30).with_max_drift(1.0);
    config.save(&path).unwrap();
    let loaded = SnowConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config);
}

#[test]
fn test_unusable_timer_ranges_are_rejected() {
    let mut huge = SnowConfig::default().with_autostart(false);
    huge.lifetime = 1.0e20..2.0e20;
    let mut instant = SnowConfig::default().with_autostart(false);
    instant.gust_delay = 0.0..1.0e-12;

    for config in [huge, instant] {
        let built = SnowView::with_rng(bounds(), NullCanvas, config, SnowRng::seeded(1));
        assert!(matches!(built, Err(ConfigError::InvalidRange { .. })));
    }
}

// ============================================================================
// Wind
// ============================================================================

#[test]
fn test_gusts_oscillate_without_clamp() {
    let mut view = stopped_view(3);
    let start = view.group(GroupId::A).direction().x;
    view.start();
    view.run_for(Duration::from_secs(30), FRAME);

    let fires = view.wind().fires();
    assert!(fires > 20);
    let dx = view.group(GroupId::A).direction().x;
    // An even number of gusts returns to the start, an odd number sits 0.4 left
    let expected = if fires % 2 == 0 { start } else { start - 0.4 };
    assert!((dx - expected).abs() < 1e-4);
}

#[test]
fn test_max_drift_clamps_direction() {
    let mut config = SnowConfig::default().with_autostart(false).with_max_drift(0.3);
    config.group_b.gust = 2.0;
    let mut view = SnowView::with_rng(bounds(), NullCanvas, config, SnowRng::seeded(4)).unwrap();
    view.start();
    view.run_for(Duration::from_secs(10), FRAME);
    assert!(view.group(GroupId::B).direction().x.abs() <= 0.3);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_canvas_mirrors_flakes() {
    let mut view = stopped_view(10);
    view.start();
    view.run_for(Duration::from_secs(8), FRAME);

    let instances = view.canvas().instances();
    assert_eq!(instances.len(), view.population());
    for (flake, instance) in view.flakes().iter().zip(&instances) {
        assert_eq!(instance.position, flake.position.to_array());
        assert_eq!(instance.size, flake.size as f32);
        assert_eq!(instance.group, flake.group.index());
    }
    assert_eq!(view.canvas().instance_bytes().len(), instances.len() * 16);
}
