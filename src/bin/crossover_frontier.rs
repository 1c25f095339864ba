//! Sweep investment returns and map each to its crossover age
//!
//! Outputs crossover_frontier.csv for plotting the strategy frontier: the
//! return below which whole life eventually overtakes the invested fund.

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use btid_engine::policy::{PolicyParameters, CEILING_AGE};
use btid_engine::projection::Projector;

fn main() {
    env_logger::init();

    let start = Instant::now();
    let params = PolicyParameters::new(30, 85, 300_000.0, 6_000.0, 800.0, 0.0375, 20, 3.0, 70, 70)
        .expect("valid baseline profile");
    let projector = Projector::new(params);

    // 0.0% to 10.0% in 0.1% steps
    let returns: Vec<f64> = (0..=100).map(|i| i as f64 * 0.001).collect();

    println!("Sweeping {} return points...", returns.len());
    let frontier = projector.crossover_frontier(&returns).expect("finite sweep returns");
    println!("Sweep finished in {:?}", start.elapsed());

    let csv_path = "crossover_frontier.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(file, "investment_return,crossover_age").unwrap();
    for (r, age) in &frontier {
        writeln!(file, "{:.3},{}", r, age).unwrap();
    }
    println!("Frontier written to: {}", csv_path);

    // Key milestones: the last return that still crosses, and sample points
    let last_crossing = frontier.iter().rev().find(|(_, age)| *age < CEILING_AGE);
    match last_crossing {
        Some((r, age)) => {
            println!("Highest return with a crossover: {:.3} (age {})", r, age)
        }
        None => println!("No crossover anywhere in the sweep"),
    }

    println!("\nSample points:");
    for &i in &[0, 10, 20, 30, 40, 50, 100] {
        if let Some((r, age)) = frontier.get(i) {
            if *age < CEILING_AGE {
                println!("  r={:.3}: crossover at age {}", r, age);
            } else {
                println!("  r={:.3}: never crosses", r);
            }
        }
    }
}
