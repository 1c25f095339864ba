//! BTID Engine CLI
//!
//! Command-line interface for comparing buy-term-invest-the-difference
//! against a participating whole-life policy: deterministic projection,
//! crossover search, and a Monte Carlo lifetime simulation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use btid_engine::stochastic::summarize;
use btid_engine::{
    ActuarialTables, BatchSummary, EconomicAssumptions, PolicyParameters, Projector, Sex,
    SimulationRequest, StochasticSimulator,
};

#[derive(Parser, Debug)]
#[command(
    name = "btid_engine",
    version,
    about = "Compare buy-term-invest-the-difference against whole-life cover"
)]
struct Cli {
    /// Age at issue
    #[arg(long, default_value_t = 30)]
    current_age: u8,

    /// Projection horizon for the deterministic run
    #[arg(long, default_value_t = 85)]
    death_age: u8,

    /// Sum assured shared by both products
    #[arg(long, default_value_t = 300_000.0)]
    sum_assured: f64,

    /// Annual whole-life premium
    #[arg(long, default_value_t = 6_000.0)]
    wl_premium: f64,

    /// Annual term premium
    #[arg(long, default_value_t = 800.0)]
    term_premium: f64,

    /// Participating rate credited to the WL cash value after build-up
    #[arg(long, default_value_t = 0.0375)]
    wl_participating_rate: f64,

    /// Premium payment term in years
    #[arg(long, default_value_t = 20)]
    payment_term: u32,

    /// WL death-benefit multiplier before the drop-off age
    #[arg(long, default_value_t = 3.0)]
    multiplier_factor: f64,

    /// Age at which the multiplier drops to 1x
    #[arg(long, default_value_t = 70)]
    multiplier_age: u8,

    /// Age at which term coverage ceases
    #[arg(long, default_value_t = 70)]
    term_expiry_age: u8,

    /// Annual return on the invested premium difference
    #[arg(long, default_value_t = 0.05)]
    investment_return: f64,

    /// Rate for present-value columns
    #[arg(long, default_value_t = 0.03)]
    discount_rate: f64,

    /// Sex of the insured: male or female
    #[arg(long, default_value = "male")]
    sex: String,

    /// Number of simulated lifetimes
    #[arg(long, default_value_t = 10_000)]
    lives: usize,

    /// Base seed for the simulation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Allow multiple WL critical-illness claims
    #[arg(long)]
    multi_pay: bool,

    /// WL claim cap when multi-pay is enabled
    #[arg(long, default_value_t = 2)]
    max_claims: u32,

    /// Directory holding mortality.csv and ci_incidence.csv. Built-in
    /// illustrative tables are used when omitted.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Emit a single JSON report instead of formatted tables
    #[arg(long)]
    json: bool,
}

/// Machine-readable report for the --json flag
#[derive(Serialize)]
struct Report {
    params: PolicyParameters,
    projection: btid_engine::projection::ProjectionSummary,
    crossover_age: u8,
    cumulative_ci_risk_pct: f64,
    simulation: BatchSummary,
}

fn parse_sex(raw: &str) -> Result<Sex> {
    match raw.to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Sex::Male),
        "female" | "f" => Ok(Sex::Female),
        other => bail!("unknown sex {other:?}, expected male or female"),
    }
}

fn load_tables(data_dir: Option<&PathBuf>, sex: Sex) -> Result<ActuarialTables> {
    match data_dir {
        Some(dir) => ActuarialTables::from_csv(dir, sex)
            .with_context(|| format!("loading actuarial tables from {}", dir.display())),
        None => Ok(ActuarialTables::illustrative(sex)),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let sex = parse_sex(&cli.sex)?;
    let params = PolicyParameters::new(
        cli.current_age,
        cli.death_age,
        cli.sum_assured,
        cli.wl_premium,
        cli.term_premium,
        cli.wl_participating_rate,
        cli.payment_term,
        cli.multiplier_factor,
        cli.multiplier_age,
        cli.term_expiry_age,
    )?;

    let econ = EconomicAssumptions::new(cli.investment_return, cli.discount_rate)?;
    let projector = Projector::new(params.clone());
    let table = projector.project(econ);
    let crossover_age = projector.crossover_age(cli.investment_return)?;

    let tables = load_tables(cli.data_dir.as_ref(), sex)?;
    let cumulative_ci_risk = tables.cumulative_risk(cli.current_age, cli.term_expiry_age);

    let request = SimulationRequest::new(
        cli.lives,
        cli.investment_return,
        cli.discount_rate,
        cli.multi_pay,
        cli.max_claims,
    )?;
    let outcomes = StochasticSimulator::new(tables, cli.seed).simulate(&params, &request);
    let batch = summarize(&outcomes);

    if cli.json {
        let report = Report {
            params,
            projection: table.summary(),
            crossover_age,
            cumulative_ci_risk_pct: cumulative_ci_risk,
            simulation: batch,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("BTID Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("==================\n");

    println!("Profile: {} age {}, horizon {}", sex.as_str(), params.current_age, params.death_age);
    println!("  Sum Assured: ${:.0}", params.sum_assured);
    println!("  WL Premium: ${:.0}/yr   Term Premium: ${:.0}/yr", params.wl_premium, params.term_premium);
    println!("  Payment Term: {} yrs   Term Expiry: age {}", params.payment_term, params.term_expiry_age);
    println!("  Investment Return: {:.2}%   Discount Rate: {:.2}%", econ.investment_return * 100.0, econ.discount_rate * 100.0);
    println!();

    println!("Projection ({} years):", params.duration());
    println!(
        "{:>4} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Age", "BTID Fund", "WL Value", "BTID Death", "WL Death", "BTID PV", "WL PV"
    );
    println!("{}", "-".repeat(94));
    for row in &table {
        println!(
            "{:>4} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.age, row.btid_nominal, row.wl_nominal, row.btid_death, row.wl_death, row.btid_pv, row.wl_pv,
        );
    }

    let summary = table.summary();
    println!("\nSummary:");
    println!("  Final BTID Fund: ${:.2} (PV ${:.2})", summary.final_btid_nominal, summary.final_btid_pv);
    println!("  Final WL Value:  ${:.2} (PV ${:.2})", summary.final_wl_nominal, summary.final_wl_pv);
    println!("  Peak BTID Death Benefit: ${:.2}", summary.peak_btid_death);
    println!("  Peak WL Death Benefit:   ${:.2}", summary.peak_wl_death);

    if crossover_age < btid_engine::policy::CEILING_AGE {
        println!("\nCrossover: WL overtakes BTID at age {crossover_age}");
    } else {
        println!("\nCrossover: never (BTID stays ahead to age {})", btid_engine::policy::CEILING_AGE);
    }
    println!(
        "Cumulative CI risk, age {} to {}: {:.2}%",
        params.current_age, params.term_expiry_age, cumulative_ci_risk
    );

    println!("\nSimulation ({} lives, seed {}):", batch.lives, cli.seed);
    println!("  Mean Wealth Differential (PV):   ${:.2}", batch.mean_wealth_diff);
    println!("  Median Wealth Differential (PV): ${:.2}", batch.median_wealth_diff);
    println!("  BTID Win Rate: {:.2}%", batch.btid_win_rate * 100.0);
    println!("  CI Claims: {}   Death Claims: {}   Survivors: {}", batch.ci_claims, batch.death_claims, batch.survivors);
    println!("  Mean Final Age: {:.1}", batch.mean_final_age);

    Ok(())
}
