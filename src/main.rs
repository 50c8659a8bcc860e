//! Ternuino - CLI Entry Point
//!
//! Commands:
//! - `ternuino run <design>` - Step a design and print probe readings
//! - `ternuino bench <design>` - Interactive terminal bench
//! - `ternuino validate <design>` - Report unwired ports
//! - `ternuino fmt <design>` - Load and re-export a design
//! - `ternuino demo` - Step the built-in sample circuits
//! - `ternuino test` - Built-in self-test

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ternuino")]
#[command(version = "0.1.0")]
#[command(about = "A gate-level simulator for balanced ternary and binary logic circuits")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a design and print probe readings
    Run {
        /// Path to the design JSON file
        design: String,
        /// Number of steps to run
        #[arg(short, long, default_value = "1")]
        steps: u64,
        /// Toggle this switch before stepping (repeatable)
        #[arg(short, long)]
        toggle: Vec<String>,
        /// Step until the circuit stops changing, at most this many steps
        #[arg(long, conflicts_with = "steps")]
        settle: Option<u64>,
        /// Print every port value after each step
        #[arg(long)]
        trace: bool,
        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive terminal bench
    Bench {
        /// Path to the design JSON file
        design: String,
        /// Milliseconds between steps while running
        #[arg(short, long, default_value = "250")]
        cadence_ms: u64,
    },
    /// Report components with unconnected ports
    Validate {
        /// Path to the design JSON file
        design: String,
    },
    /// Load a design and write it back out normalized
    Fmt {
        /// Path to the design JSON file
        design: String,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Step the built-in sample circuits
    Demo,
    /// Run the built-in self-test
    Test,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run { design, steps, toggle, settle, trace, json }) => {
            run_design(&design, steps, &toggle, settle, trace, json);
        }
        Some(Commands::Bench { design, cadence_ms }) => {
            bench_design(&design, cadence_ms);
        }
        Some(Commands::Validate { design }) => {
            validate_design(&design);
        }
        Some(Commands::Fmt { design, output }) => {
            format_design(&design, output);
        }
        Some(Commands::Demo) => {
            run_demo();
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Ternuino v0.1.0");
            println!("A balanced ternary logic circuit simulator");
            println!();
            println!("Use --help for available commands");
            println!();
            demo_logic_tables();
        }
    }
}

fn load_or_exit(path: &str) -> ternuino::Circuit {
    match ternuino::load_design(path) {
        Ok(circuit) => circuit,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn run_design(path: &str, steps: u64, toggles: &[String], settle: Option<u64>, trace: bool, json: bool) {
    use ternuino::Simulator;

    let mut sim = Simulator::new(load_or_exit(path));

    for id in toggles {
        match sim.toggle_switch(id) {
            Ok(value) => {
                if !json {
                    println!("🔀 {} = {}", id, value);
                }
            }
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
    }

    let result = match settle {
        Some(max) => sim.run_until_stable(max).map(|settled| {
            if json {
                return;
            }
            match settled {
                Some(n) => println!("✓ Stable after {} steps", n),
                None => println!("⚠️  Still changing after {} steps", max),
            }
        }),
        None => (0..steps).try_for_each(|_| {
            let n = sim.step()?;
            if trace && !json {
                println!("━━━ Step {} ━━━", n);
                print!("{}", sim.circuit().snapshot());
            }
            Ok::<(), ternuino::CircuitError>(())
        }),
    };

    if let Err(e) = result {
        eprintln!("❌ Step {} failed: {}", sim.steps() + 1, e);
        std::process::exit(1);
    }

    if json {
        match serde_json::to_string_pretty(&sim.circuit().snapshot()) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to encode snapshot: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!();
    println!("━━━ Probes after {} steps ━━━", sim.steps());
    for (id, value) in sim.circuit().probes() {
        println!("  {:<12} {:>2}", id, value.to_i8());
    }
}

#[cfg(feature = "tui")]
fn bench_design(path: &str, cadence_ms: u64) {
    use std::time::Duration;

    let circuit = load_or_exit(path);
    println!("🚀 Launching bench...");

    if let Err(e) = ternuino::run_bench(path, circuit, Duration::from_millis(cadence_ms)) {
        eprintln!("❌ Bench error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "tui"))]
fn bench_design(_path: &str, _cadence_ms: u64) {
    eprintln!("❌ Built without the `tui` feature");
    std::process::exit(1);
}

fn validate_design(path: &str) {
    let circuit = load_or_exit(path);
    let report = circuit.unwired();

    if report.is_empty() {
        println!("✓ All {} components wired", circuit.len());
        return;
    }

    println!("⚠️  {} component(s) with missing connections:", report.len());
    for entry in &report {
        println!("  {}", entry);
    }
}

fn format_design(path: &str, output: Option<String>) {
    let circuit = load_or_exit(path);

    match output {
        Some(out) => {
            if let Err(e) = ternuino::save_design(&out, &circuit) {
                eprintln!("❌ Failed to save {}: {}", out, e);
                std::process::exit(1);
            }
            println!("✓ Saved to {}", out);
        }
        None => match ternuino::dump_string(&circuit) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn demo_logic_tables() {
    use ternuino::Trit;
    use ternuino::ternary::{and, nor, not};

    println!("━━━ Ternary Logic ━━━");
    println!();
    println!("  x   NOT");
    for x in Trit::ALL {
        println!("  {:>2}  {:>3}", x.to_i8(), not(x).to_i8());
    }
    println!();
    println!("  x   y   AND  NOR");
    for x in Trit::ALL {
        for y in Trit::ALL {
            println!("  {:>2}  {:>2}  {:>3}  {:>3}", x.to_i8(), y.to_i8(), and(x, y).to_i8(), nor(x, y).to_i8());
        }
    }
}

fn run_demo() {
    use ternuino::{Simulator, Trit};
    use ternuino::design::samples;

    println!("━━━ Latch bench ━━━");
    let mut sim = match samples::latch_bench() {
        Ok(circuit) => Simulator::new(circuit),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    let steps = sim.step().and_then(|_| {
        println!("Probe after step 1: {}", sim.probe("p1")?);
        sim.toggle_switch("sw1")?;
        sim.toggle_switch("sw2")?;
        sim.step()?;
        println!("Probe after step 2: {}", sim.probe("p1")?);
        Ok(sim.steps())
    });
    if let Err(e) = steps {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    println!();
    println!("━━━ Full adder ━━━");
    for (a, b, c) in [
        (Trit::Pos, Trit::Pos, Trit::Null),
        (Trit::Pos, Trit::Pos, Trit::Pos),
        (Trit::Neg, Trit::Null, Trit::Pos),
    ] {
        let mut circuit = match samples::full_adder(a, b, c) {
            Ok(circuit) => circuit,
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        };
        if let Err(e) = circuit.step() {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        let sum = circuit.probe("sum").unwrap_or_default();
        let carry = circuit.probe("carry").unwrap_or_default();
        println!("  {:>2} + {:>2} + {:>2} = {:>2} + 3×{:>2}", a.to_i8(), b.to_i8(), c.to_i8(), sum.to_i8(), carry.to_i8());
    }
}

fn run_self_test() {
    use ternuino::{Circuit, Component, Kind, Simulator, Trit, Wire};
    use ternuino::circuit::resolve;

    println!("━━━ Ternuino Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    // Test 1: NOT involution
    print!("NOT involution... ");
    if Trit::ALL.iter().all(|t| t.neg().neg() == *t) { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 2: Resolution
    print!("Multi-driver resolution... ");
    let ok = resolve(&[Trit::Pos, Trit::Neg]) == Trit::Null
        && resolve(&[Trit::Pos, Trit::Null, Trit::Pos]) == Trit::Pos
        && resolve(&[]) == Trit::Null;
    if ok { println!("✓"); passed += 1; }
    else { println!("✗"); failed += 1; }

    // Test 3: Inverter chain
    print!("Switch → TNOT → probe... ");
    let chain = Circuit::from_parts(
        [
            Component::binary_switch("sw1", true),
            Component::new("g1", Kind::TNot),
            Component::new("p1", Kind::Probe),
        ],
        [
            Wire::between("sw1", "out", "g1", "in"),
            Wire::between("g1", "out", "p1", "in"),
        ],
    );
    let ok = chain
        .map(Simulator::new)
        .map_err(Into::into)
        .and_then(|mut sim| {
            sim.step()?;
            let first = sim.probe("p1")?;
            sim.toggle_switch("sw1")?;
            sim.step()?;
            Ok::<_, ternuino::CircuitError>((first, sim.probe("p1")?))
        });
    match ok {
        Ok((Trit::Neg, Trit::Null)) => { println!("✓"); passed += 1; }
        other => { println!("✗ (got {:?})", other); failed += 1; }
    }

    // Test 4: Latch hold
    print!("Latch write then hold... ");
    let latch = Circuit::from_parts(
        [
            Component::ternary_switch("d", Trit::Pos),
            Component::binary_switch("en", true),
            Component::new("l1", Kind::TLatch),
        ],
        [
            Wire::between("d", "out", "l1", "in"),
            Wire::between("en", "out", "l1", "enable"),
        ],
    );
    let ok = latch
        .map(Simulator::new)
        .map_err(Into::into)
        .and_then(|mut sim| {
            sim.step()?;
            sim.set_switch("d", Trit::Neg)?;
            sim.set_switch("en", Trit::Null)?;
            sim.step()?;
            Ok::<_, ternuino::CircuitError>(sim.circuit().component("l1").and_then(|c| c.gate().held()))
        });
    match ok {
        Ok(Some(Trit::Pos)) => { println!("✓"); passed += 1; }
        other => { println!("✗ (got {:?})", other); failed += 1; }
    }

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
