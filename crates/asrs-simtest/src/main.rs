//! ASRS Headless Simulation Harness
//!
//! Drives the warehouse engine from a JSON scenario and validates its
//! invariants. Runs entirely in-process — no DB, no networking, no rendering.
//!
//! Usage:
//!   cargo run -p asrs-simtest
//!   cargo run -p asrs-simtest -- path/to/scenario.json --verbose
//!   RUST_LOG=asrs_logic=debug cargo run -p asrs-simtest

use asrs_logic::prelude::*;
use asrs_logic::source::{ArrivalSource, SourceSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

// ── Scenario (default lives in data/) ───────────────────────────────────
const DEFAULT_SCENARIO: &str = include_str!("../../../data/scenario.json");

#[derive(Debug, Deserialize)]
struct Scenario {
    seed: u64,
    /// Time parameter handed to the holding-cost calculation.
    elapsed: f64,
    /// Gets to perform under each retrieval policy.
    retrievals: usize,
    warehouse: WarehouseConfig,
    source: SourceSpec,
}

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

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    let path = std::env::args().skip(1).find(|a| !a.starts_with("--"));
    println!("=== ASRS Simulation Harness ===\n");

    let raw = match &path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("cannot read scenario {p}: {e}");
                std::process::exit(2);
            }
        },
        None => DEFAULT_SCENARIO.to_string(),
    };

    let mut results = Vec::new();

    // 1. Scenario parsing & validation
    let Some(scenario) = load_scenario(&raw, &mut results) else {
        report(&results, verbose);
        return;
    };

    // 2. Retrieval ordering on a scratch cell
    results.extend(validate_retrieval_order(verbose));

    // 3. Soft failures
    results.extend(validate_soft_failures(&scenario.warehouse, verbose));

    // 4. Inbound flow from the arrival source
    let mut warehouse = match Warehouse::new(scenario.warehouse.clone()) {
        Ok(w) => w,
        Err(e) => {
            results.push(TestResult::check("warehouse_build", false, e.to_string()));
            report(&results, verbose);
            return;
        }
    };
    results.extend(run_inbound(&scenario, &mut warehouse, verbose));

    // 5. Holding cost under both policies
    results.extend(validate_holding_cost(&scenario, &mut warehouse, verbose));

    // 6. Outbound flow under each retrieval policy
    results.extend(run_outbound(&scenario, &mut warehouse, verbose));

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
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

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Scenario ─────────────────────────────────────────────────────────

fn load_scenario(raw: &str, results: &mut Vec<TestResult>) -> Option<Scenario> {
    println!("--- Scenario ---");
    let scenario: Scenario = match serde_json::from_str(raw) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult::check(
                "scenario_parse",
                false,
                format!("JSON parse error: {e}"),
            ));
            return None;
        }
    };

    let config_check = scenario.warehouse.validate();
    results.push(TestResult::check(
        "scenario_warehouse_config",
        config_check.is_ok(),
        match &config_check {
            Ok(()) => format!(
                "{} grid, capacity {}",
                scenario.warehouse.dimensions, scenario.warehouse.max_items_per_cell
            ),
            Err(e) => e.to_string(),
        },
    ));

    let source_check = ArrivalSource::new(scenario.source.clone());
    results.push(TestResult::check(
        "scenario_source",
        source_check.is_ok(),
        match &source_check {
            Ok(_) => format!("inter-arrival {}", scenario.source.inter_arrival),
            Err(e) => e.to_string(),
        },
    ));

    results.push(TestResult::check(
        "scenario_elapsed",
        scenario.elapsed.is_finite() && scenario.elapsed >= 0.0,
        format!("elapsed = {}", scenario.elapsed),
    ));

    if results.iter().any(|r| !r.passed) {
        return None;
    }
    Some(scenario)
}

// ── 2. Retrieval ordering ───────────────────────────────────────────────

fn validate_retrieval_order(verbose: bool) -> Vec<TestResult> {
    println!("--- Retrieval Ordering ---");
    let mut results = Vec::new();

    let batch = [("A", 1), ("B", 3), ("C", 2), ("D", 2), ("E", 3)];
    let expected: [(RetrievalPolicy, [&str; 5]); 3] = [
        (RetrievalPolicy::Fifo, ["A", "B", "C", "D", "E"]),
        (RetrievalPolicy::Lifo, ["E", "D", "C", "B", "A"]),
        (RetrievalPolicy::Priority, ["B", "E", "C", "D", "A"]),
    ];

    for (policy, order) in expected {
        let mut wh = match Warehouse::with_dimensions(1, 1, 1) {
            Ok(w) => w,
            Err(e) => {
                results.push(TestResult::check("order_build", false, e.to_string()));
                return results;
            }
        };
        for (id, priority) in batch {
            wh.put(StoredEntity::new(id, "probe").with_priority(priority), Position::ORIGIN);
        }
        wh.set_retrieval_policy(policy);
        let got: Vec<String> = std::iter::from_fn(|| wh.transport().get(Position::ORIGIN))
            .map(|e| e.id)
            .collect();
        if verbose {
            println!("  {policy}: {}", got.join(" "));
        }
        results.push(TestResult::check(
            &format!("order_{}", policy.label().to_lowercase()),
            got == order,
            format!("got [{}], expected [{}]", got.join(", "), order.join(", ")),
        ));
    }

    results
}

// ── 3. Soft failures ────────────────────────────────────────────────────

fn validate_soft_failures(config: &WarehouseConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Soft Failures ---");
    let mut results = Vec::new();

    let single_slot = WarehouseConfig {
        max_items_per_cell: 1,
        ..config.clone()
    };
    let mut wh = match Warehouse::new(single_slot) {
        Ok(w) => w,
        Err(e) => {
            results.push(TestResult::check("soft_build", false, e.to_string()));
            return results;
        }
    };

    let dims = wh.dimensions();
    let outside = Position::new(dims.x as i32, 0, 0);
    let rejected = wh.transport().try_put(StoredEntity::new("X", "probe"), outside);
    results.push(TestResult::check(
        "soft_out_of_bounds",
        matches!(&rejected, Err(r) if r.reason == RejectReason::OutOfBounds)
            && wh.total_entity_count() == 0
            && wh.agent().current_position() == outside,
        format!("put at {outside} rejected, agent parked at {}", wh.agent().current_position()),
    ));

    let first = wh.put(StoredEntity::new("E1", "probe"), Position::ORIGIN);
    let second = wh.try_put(StoredEntity::new("E2", "probe"), Position::ORIGIN);
    let returned = second.as_ref().err().map(|r| r.entity.id.clone());
    results.push(TestResult::check(
        "soft_cell_full",
        first && returned.as_deref() == Some("E2"),
        format!("second put rejected, entity handed back: {returned:?}"),
    ));

    let got = wh.get(Position::ORIGIN).map(|e| e.id);
    let empty = wh.get(Position::ORIGIN);
    results.push(TestResult::check(
        "soft_empty_get",
        got.as_deref() == Some("E1") && empty.is_none(),
        "get returns E1 then nothing",
    ));

    results.push(TestResult::check(
        "soft_invalid_queries",
        wh.entities_at(outside).is_empty() && wh.cell_capacity_info(outside).is_none(),
        "entities_at / cell_capacity_info outside the grid are empty",
    ));

    if verbose {
        println!("  agent stats: {:?}", wh.agent().stats());
    }
    results
}

// ── 4. Inbound ──────────────────────────────────────────────────────────

fn run_inbound(scenario: &Scenario, wh: &mut Warehouse, verbose: bool) -> Vec<TestResult> {
    println!("--- Inbound ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(scenario.seed);
    let mut source = match ArrivalSource::new(scenario.source.clone()) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult::check("inbound_source", false, e.to_string()));
            return results;
        }
    };

    let mut rejected = 0usize;
    let mut arrivals = 0usize;
    // An unbounded push source would never stop; cap at one attempt per slot.
    let slot_count = wh.cell_count() * wh.max_items_per_cell();
    while arrivals <= slot_count {
        let ready = wh.first_available_position().is_some();
        let Some(arrival) = source.next_batch(&mut rng, ready) else {
            break;
        };
        arrivals += 1;
        for entity in arrival.entities {
            let target = wh.first_available_position().unwrap_or(Position::ORIGIN);
            if let Err(r) = wh.transport().try_put(entity, target) {
                log::debug!("arrival at t={:.2} rejected: {}", arrival.time, r);
                rejected += 1;
            }
        }
    }

    let stored = wh.total_entity_count();
    let emitted = source.emitted() as usize;
    if verbose {
        println!(
            "  {arrivals} arrivals, {emitted} emitted, {stored} stored, {rejected} rejected, clock {:.2}",
            source.clock()
        );
    }

    results.push(TestResult::check(
        "inbound_conservation",
        stored + rejected == emitted,
        format!("{stored} stored + {rejected} rejected = {emitted} emitted"),
    ));

    let max = wh.max_items_per_cell();
    let over: Vec<_> = wh.cells().filter(|c| c.len() > max).map(|c| c.position()).collect();
    results.push(TestResult::check(
        "inbound_capacity",
        over.is_empty(),
        if over.is_empty() {
            format!("no cell above {max}")
        } else {
            format!("{} cells over capacity", over.len())
        },
    ));

    let sum: usize = wh
        .dimensions()
        .positions()
        .map(|p| wh.entities_at(p).len())
        .sum();
    results.push(TestResult::check(
        "inbound_count_consistency",
        sum == stored,
        format!("per-position sum {sum}, total {stored}"),
    ));

    let stats = *wh.agent().stats();
    let expected_busy = stats.completed_puts as f64 * scenario.warehouse.inbound_time;
    results.push(TestResult::check(
        "inbound_agent_stats",
        stats.completed_puts as usize == stored
            && stats.failed_operations as usize == rejected
            && (stats.busy_time - expected_busy).abs() < 1e-9,
        format!(
            "{} puts, {} failures, busy {:.2}",
            stats.completed_puts, stats.failed_operations, stats.busy_time
        ),
    ));

    results
}

// ── 5. Holding cost ─────────────────────────────────────────────────────

fn validate_holding_cost(
    scenario: &Scenario,
    wh: &mut Warehouse,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Holding Cost ---");
    let mut results = Vec::new();
    let original = wh.holding_cost_policy();

    let occupied = wh.cells().filter(|c| !c.is_empty()).count();
    let entity_sum: f64 = wh.cells().flat_map(|c| c.iter()).map(|e| e.holding_cost).sum();

    for policy in HoldingCostPolicy::ALL {
        wh.set_holding_cost_policy(policy);
        let expected = match policy {
            HoldingCostPolicy::PerTimeUnit => {
                occupied as f64 * scenario.warehouse.cost_rate * scenario.elapsed
            }
            HoldingCostPolicy::PerEntityUnit => entity_sum,
        };
        match wh.total_holding_cost(scenario.elapsed) {
            Ok(cost) => {
                if verbose {
                    println!("  {policy}: {cost:.4}");
                }
                results.push(TestResult::check(
                    &format!("cost_{}", policy.label()),
                    (cost - expected).abs() < 1e-9,
                    format!("{cost:.4} (expected {expected:.4})"),
                ));
            }
            Err(e) => results.push(TestResult::check(
                &format!("cost_{}", policy.label()),
                false,
                e.to_string(),
            )),
        }
    }

    results.push(TestResult::check(
        "cost_rejects_negative_elapsed",
        wh.total_holding_cost(-1.0).is_err(),
        "negative elapsed is a hard error",
    ));

    wh.set_holding_cost_policy(original);
    results
}

// ── 6. Outbound ─────────────────────────────────────────────────────────

fn run_outbound(scenario: &Scenario, wh: &mut Warehouse, verbose: bool) -> Vec<TestResult> {
    println!("--- Outbound ---");
    let mut results = Vec::new();

    for policy in RetrievalPolicy::ALL {
        wh.set_retrieval_policy(policy);
        let before = wh.total_entity_count();
        let gets_before = wh.agent().stats().completed_gets;

        let mut retrieved = 0usize;
        for _ in 0..scenario.retrievals {
            let fullest = wh
                .cells()
                .filter(|c| !c.is_empty())
                .max_by_key(|c| c.len())
                .map(|c| c.position());
            let Some(target) = fullest else { break };
            if wh.transport().get(target).is_some() {
                retrieved += 1;
            }
        }

        let after = wh.total_entity_count();
        let gets = wh.agent().stats().completed_gets - gets_before;
        if verbose {
            println!("  {policy}: retrieved {retrieved}, {after} left");
        }
        results.push(TestResult::check(
            &format!("outbound_{}", policy.label().to_lowercase()),
            before - after == retrieved && gets as usize == retrieved,
            format!("{before} -> {after} after {retrieved} gets"),
        ));
    }

    results
}
