//! WinHack Headless Simulation Harness
//!
//! Runs scripted sessions against the simulation core and validates its
//! invariants. Runs entirely in-process, no window and no rendering.
//!
//! Usage:
//!   cargo run -p winhack-simtest
//!   cargo run -p winhack-simtest -- --verbose
//!   cargo run -p winhack-simtest -- --config path/to/config.json --seconds 600

use winhack_core::components::{Position, Resource, Unit};
use winhack_core::progress::percent;
use winhack_core::prelude::*;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ── Default tuning (same JSON the game ships) ──────────────────────────
const DEFAULT_CONFIG_JSON: &str = include_str!("../../../data/default_config.json");

const TICK: f32 = 1.0 / 30.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

struct Args {
    verbose: bool,
    config_path: Option<String>,
    seconds: f32,
}

fn parse_args() -> Args {
    let mut args = Args {
        verbose: false,
        config_path: None,
        seconds: 180.0,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => args.verbose = true,
            "--config" => args.config_path = iter.next(),
            "--seconds" => match iter.next().map(|s| (s.parse::<f32>(), s)) {
                Some((Ok(seconds), _)) if seconds.is_finite() && seconds > 0.0 => {
                    args.seconds = seconds
                }
                Some((_, raw)) => eprintln!(
                    "ignoring invalid --seconds `{}`, using {}",
                    raw, args.seconds
                ),
                None => eprintln!("--seconds needs a value, using {}", args.seconds),
            },
            other => eprintln!("ignoring unknown argument `{}`", other),
        }
    }
    args
}

fn init_logging(verbose: bool) {
    let default = if verbose { "winhack_core=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn main() {
    let args = parse_args();
    init_logging(args.verbose);
    println!("=== WinHack Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(&args, &mut results) {
        Some(config) => config,
        None => {
            report(&results, args.verbose);
            std::process::exit(1);
        }
    };

    // 2. Progress curve
    results.extend(validate_progress_curve(args.verbose));

    // 3. Upgrade ladders
    results.extend(validate_upgrade_ladders(&config, args.verbose));

    // 4. Scripted player session
    results.extend(validate_scripted_session(&config, args.seconds, args.verbose));

    // 5. Determinism
    results.extend(validate_determinism(&config, args.verbose));

    // 6. Objective timer
    results.extend(validate_objective_timer(&config, args.verbose));

    if !report(&results, args.verbose) {
        std::process::exit(1);
    }
}

/// Print the summary; returns true when everything passed
fn report(results: &[TestResult], verbose: bool) -> bool {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );
    failed == 0
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn load_config(args: &Args, results: &mut Vec<TestResult>) -> Option<SimConfig> {
    println!("--- Configuration ---");

    let loaded = match &args.config_path {
        Some(path) => SimConfig::from_path(path),
        None => SimConfig::from_json_str(DEFAULT_CONFIG_JSON),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            results.push(TestResult::check("config_load", false, e.to_string()));
            return None;
        }
    };
    results.push(TestResult::check(
        "config_load",
        true,
        format!(
            "{} unit archetypes, {} shop entries",
            config.units.len(),
            config.shop.len()
        ),
    ));

    // Shipped JSON must agree with the compiled-in defaults
    if args.config_path.is_none() {
        let defaults = SimConfig::default();
        let same = defaults.shop.len() == config.shop.len()
            && defaults.economy.upgrades.region.costs == config.economy.upgrades.region.costs
            && defaults.economy.upgrades.click_radius.costs
                == config.economy.upgrades.click_radius.costs
            && defaults.units.keys().eq(config.units.keys());
        results.push(TestResult::check(
            "config_matches_defaults",
            same,
            if same {
                "data/default_config.json mirrors SimConfig::default()"
            } else {
                "data/default_config.json drifted from SimConfig::default()"
            },
        ));
    }

    let mut broken = config.clone();
    broken.region.half_extent = Vec2::ZERO;
    let rejected = broken.validate().is_err();
    results.push(TestResult::check(
        "config_rejects_invalid",
        rejected,
        "zero-size region is rejected at load time",
    ));

    Some(config)
}

// ── 2. Progress Curve ───────────────────────────────────────────────────

fn validate_progress_curve(verbose: bool) -> Vec<TestResult> {
    println!("--- Progress Curve ---");
    let mut results = Vec::new();
    let target = 10_000u64;

    let anchors = [(0u64, 0.0f32), (3_000, 50.0), (6_000, 60.0), (10_000, 100.0), (50_000, 100.0)];
    let bad: Vec<_> = anchors
        .iter()
        .filter(|(earned, expected)| (percent(*earned, target) - expected).abs() > 1e-3)
        .collect();
    results.push(TestResult::check(
        "progress_anchors",
        bad.is_empty(),
        if bad.is_empty() {
            "0 / 30% / 60% / 100% / overshoot map to 0 / 50 / 60 / 100 / 100".to_string()
        } else {
            format!("{} anchors off: {:?}", bad.len(), bad)
        },
    ));

    let mut last = 0.0f32;
    let mut monotone = true;
    for earned in (0..=target + 500).step_by(25) {
        let p = percent(earned, target);
        if p + 1e-4 < last {
            monotone = false;
            if verbose {
                println!("    non-monotone at {}: {} < {}", earned, p, last);
            }
        }
        last = p;
    }
    results.push(TestResult::check(
        "progress_monotone",
        monotone,
        "sampled every 25 currency up to the target",
    ));

    results.push(TestResult::check(
        "progress_zero_target",
        percent(0, 0) == 100.0,
        "zero target counts as complete",
    ));

    results
}

// ── 3. Upgrade Ladders ──────────────────────────────────────────────────

fn validate_upgrade_ladders(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Upgrade Ladders ---");
    let mut results = Vec::new();

    for kind in UpgradeKind::ALL {
        let mut sim = match quiet_session(config) {
            Ok(sim) => sim,
            Err(e) => {
                results.push(TestResult::check("ladder_session", false, e.to_string()));
                return results;
            }
        };
        let track_config = config.economy.upgrades.get(kind);

        let mut spent = 0u64;
        let mut tiers = 0u32;
        loop {
            let Some(cost) = sim.economy().track(kind).and_then(|t| t.next_cost()) else {
                break;
            };
            sim.credit(cost);
            match sim.try_upgrade(kind) {
                Ok(step) => {
                    spent += step.cost;
                    tiers = step.tier;
                    if verbose {
                        println!("    {} tier {} for {}", kind.name(), step.tier, step.cost);
                    }
                }
                Err(refusal) => {
                    results.push(TestResult::check(
                        &format!("ladder_{}", kind.name()),
                        false,
                        format!("refused at tier {}: {}", tiers, refusal),
                    ));
                    break;
                }
            }
        }

        results.push(TestResult::check(
            &format!("ladder_{}_reaches_max", kind.name()),
            tiers == track_config.max_tier && sim.economy().balance() == 0,
            format!("{} tiers for {} total", tiers, spent),
        ));

        let maxed = matches!(sim.try_upgrade(kind), Err(Refusal::MaxTier { .. }));
        results.push(TestResult::check(
            &format!("ladder_{}_refuses_past_max", kind.name()),
            maxed,
            "next upgrade is refused with MaxTier",
        ));

        let effect_ok = match kind {
            UpgradeKind::Region => {
                let expected = config.region.half_extent.x + track_config.step * tiers as f32;
                (sim.region().half_extent().x - expected).abs() < 1e-3
            }
            UpgradeKind::ClickRadius => {
                let expected = config.click.radius + track_config.step * tiers as f32;
                (sim.click_radius() - expected).abs() < 1e-3
            }
        };
        results.push(TestResult::check(
            &format!("ladder_{}_effect", kind.name()),
            effect_ok,
            format!(
                "half-extent {:.1}, click radius {:.1}, zoom {:.1}",
                sim.region().half_extent().x,
                sim.click_radius(),
                sim.camera_zoom()
            ),
        ));
    }

    results
}

fn quiet_session(config: &SimConfig) -> Result<Simulation, ConfigError> {
    let mut config = config.clone();
    config.scene.units.clear();
    config.scene.resources.clear();
    Simulation::new(config)
}

// ── 4. Scripted Session ─────────────────────────────────────────────────

/// Per-tick invariant checks collected over a whole session
#[derive(Default)]
struct SessionStats {
    ticks: u64,
    clicks: u64,
    purchases: u64,
    refusals: u64,
    bound_violations: u64,
    balance_violations: u64,
    lifetime_regressions: u64,
    eligibility_mismatches: u64,
    dead_resources: u64,
}

fn validate_scripted_session(config: &SimConfig, seconds: f32, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Session ({:.0}s) ---", seconds);
    let mut results = Vec::new();

    let mut sim = match Simulation::new(config.clone()) {
        Ok(sim) => sim,
        Err(e) => {
            results.push(TestResult::check("session_start", false, e.to_string()));
            return results;
        }
    };

    let starting_balance = config.economy.starting_balance;
    let mut stats = SessionStats::default();
    let mut last_lifetime = 0u64;
    let mut total_credited = 0u64;
    let ticks = (seconds / TICK) as u64;

    for tick in 0..ticks {
        let input = scripted_input(&sim, tick);
        if input.pointer_down.is_some() {
            stats.clicks += 1;
        }
        sim.update(TICK, &input);
        stats.ticks += 1;

        // The bot shops every two seconds, cheapest interactable entry first
        if tick % 60 == 0 {
            let mut buttons: Vec<_> = sim
                .shop_status()
                .into_iter()
                .filter(|b| b.interactable)
                .collect();
            buttons.sort_by_key(|b| b.cost);
            if let Some(button) = buttons.first() {
                match sim.purchase(&button.id) {
                    Ok(purchase) => {
                        log::debug!("bot bought {}: {:?}", button.id, purchase);
                        stats.purchases += 1;
                    }
                    Err(refusal) => {
                        log::warn!("interactable button {} refused: {}", button.id, refusal);
                        stats.refusals += 1;
                    }
                }
            }
        }

        for event in sim.drain_events() {
            if let SimEvent::FloatingText { amount, .. } = event {
                total_credited += amount;
            }
        }

        check_invariants(&sim, starting_balance, &mut last_lifetime, &mut stats);
    }

    if verbose {
        println!(
            "    {} ticks, {} clicks, {} purchases, {} units, {} resources, balance {}, lifetime {}",
            stats.ticks,
            stats.clicks,
            stats.purchases,
            sim.unit_count(),
            sim.resource_count(),
            sim.economy().balance(),
            sim.economy().lifetime_earned()
        );
    }

    results.push(TestResult::check(
        "session_region_bounds",
        stats.bound_violations == 0,
        format!("{} ticks outside movement bounds", stats.bound_violations),
    ));
    results.push(TestResult::check(
        "session_balance_consistent",
        stats.balance_violations == 0,
        format!("{} ticks where balance exceeded earnings", stats.balance_violations),
    ));
    results.push(TestResult::check(
        "session_lifetime_monotone",
        stats.lifetime_regressions == 0,
        format!("{} regressions", stats.lifetime_regressions),
    ));
    results.push(TestResult::check(
        "session_eligibility_matches_region",
        stats.eligibility_mismatches == 0,
        format!("{} unit-ticks with stale eligibility", stats.eligibility_mismatches),
    ));
    results.push(TestResult::check(
        "session_no_dead_resources",
        stats.dead_resources == 0,
        format!("{} depleted resources left in the world", stats.dead_resources),
    ));
    results.push(TestResult::check(
        "session_earned_something",
        sim.economy().lifetime_earned() > 0 && stats.purchases > 0,
        format!(
            "lifetime {}, {} purchases, {} refusals, {:.1}% progress",
            sim.economy().lifetime_earned(),
            stats.purchases,
            stats.refusals,
            sim.progress_percent()
        ),
    ));
    results.push(TestResult::check(
        "session_click_credits_visible",
        total_credited <= sim.economy().lifetime_earned(),
        format!(
            "{} shown as floating text of {} earned",
            total_credited,
            sim.economy().lifetime_earned()
        ),
    ));

    results
}

/// A lazy player: circles the region around the origin with the keyboard and
/// clicks on the first unit inside the region every half second.
fn scripted_input(sim: &Simulation, tick: u64) -> InputFrame {
    if tick % 15 == 0 {
        let target = sim
            .world
            .query::<(&Unit, &Position)>()
            .iter()
            .find(|(_, (unit, _))| unit.can_earn)
            .map(|(_, (_, pos))| pos.0);
        if let Some(point) = target {
            return InputFrame::click(point);
        }
    }

    // Two-second square loop, small enough to keep the start area covered
    match (tick / 15) % 4 {
        0 => InputFrame::keys(1.0, 0.0),
        1 => InputFrame::keys(0.0, 1.0),
        2 => InputFrame::keys(-1.0, 0.0),
        _ => InputFrame::keys(0.0, -1.0),
    }
}

fn check_invariants(
    sim: &Simulation,
    starting_balance: u64,
    last_lifetime: &mut u64,
    stats: &mut SessionStats,
) {
    let region = sim.region();
    let bound_x = (region.max_distance().x - region.half_extent().x).max(0.0);
    let bound_y = (region.max_distance().y - region.half_extent().y).max(0.0);
    if region.position().x.abs() > bound_x + 1e-4 || region.position().y.abs() > bound_y + 1e-4 {
        stats.bound_violations += 1;
    }

    let economy = sim.economy();
    if economy.balance() > starting_balance.saturating_add(economy.lifetime_earned()) {
        stats.balance_violations += 1;
    }
    if economy.lifetime_earned() < *last_lifetime {
        stats.lifetime_regressions += 1;
    }
    *last_lifetime = economy.lifetime_earned();

    // Membership runs before movement, so compare against the recorded set
    for (entity, (unit, _)) in sim.world.query::<(&Unit, &Position)>().iter() {
        if unit.can_earn != region.is_member(entity) {
            stats.eligibility_mismatches += 1;
        }
    }

    stats.dead_resources += sim
        .world
        .query::<&Resource>()
        .iter()
        .filter(|(_, r)| !r.is_active())
        .count() as u64;
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Determinism ---");

    let run = || -> Result<(u64, u64, usize), ConfigError> {
        let mut seeded = config.clone();
        seeded.seed = Some(seeded.seed.unwrap_or(1));
        let mut sim = Simulation::new(seeded)?;
        for tick in 0..900u64 {
            let input = scripted_input(&sim, tick);
            sim.update(TICK, &input);
        }
        Ok((
            sim.economy().lifetime_earned(),
            sim.economy().ledger().get(ResourceKind::Tree),
            sim.remnant_count(),
        ))
    };

    let outcome = match (run(), run()) {
        (Ok(a), Ok(b)) => {
            if verbose {
                println!("    run A {:?}, run B {:?}", a, b);
            }
            TestResult::check("same_seed_same_outcome", a == b, format!("{:?} vs {:?}", a, b))
        }
        (Err(e), _) | (_, Err(e)) => TestResult::check("same_seed_same_outcome", false, e.to_string()),
    };
    vec![outcome]
}

// ── 6. Objective Timer ──────────────────────────────────────────────────

fn validate_objective_timer(config: &SimConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Objective Timer ---");

    let mut short = config.clone();
    short.progress.duration_secs = 2.0;
    let mut sim = match quiet_session(&short) {
        Ok(sim) => sim,
        Err(e) => return vec![TestResult::check("objective_session", false, e.to_string())],
    };

    let mut expirations = 0;
    for _ in 0..(5.0 / TICK) as u32 {
        sim.update(TICK, &InputFrame::idle());
        expirations += sim
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SimEvent::ObjectiveExpired { .. }))
            .count();
    }
    if verbose {
        println!("    clock reads {}", sim.hack_timer().clock_text());
    }

    vec![TestResult::check(
        "objective_expires_once",
        expirations == 1 && sim.hack_timer().is_expired(),
        format!("{} expirations over 5s with a 2s countdown", expirations),
    )]
}
