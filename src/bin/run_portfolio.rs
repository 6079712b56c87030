//! Run simulations for an entire loan portfolio CSV
//!
//! Outputs per-loan indicators plus a portfolio summary; the --json flag
//! emits the whole result set for API integration.
//! Accepts config via environment variables:
//!   PORTFOLIO_CSV, DISCOUNT_RATE_PCT, PROPERTY_VALUE

use credit_system::loan::{load_default_portfolio, load_loans};
use credit_system::{rates, AncillaryCharges, Compounding, RateType, SimulationRunner};
use log::warn;
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

#[derive(Serialize)]
struct PortfolioResponse {
    loan_count: usize,
    simulated: usize,
    rejected: usize,
    discount_rate_pct: f64,
    total_principal: f64,
    results: Vec<LoanIndicators>,
    execution_time_ms: u64,
}

#[derive(Serialize, Clone)]
struct LoanIndicators {
    loan_id: u32,
    currency: &'static str,
    principal: f64,
    term_months: u32,
    irr_annual_pct: f64,
    tcea_all_in_pct: f64,
    tcea_interest_only_pct: f64,
    npv: f64,
    total_interest: f64,
    total_charges: f64,
    converged: bool,
}

fn main() {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    // Read config from environment or use defaults
    let portfolio_path =
        env::var("PORTFOLIO_CSV").unwrap_or_default();

    let discount_rate_pct: f64 = env::var("DISCOUNT_RATE_PCT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(credit_system::indicators::DEFAULT_OPPORTUNITY_COST_PCT);

    // When set, the standard MiVivienda charge profile is applied to
    // every loan; otherwise plans are charge-free.
    let property_value: Option<f64> = env::var("PROPERTY_VALUE")
        .ok()
        .and_then(|s| s.parse().ok());

    let loans = if portfolio_path.is_empty() {
        if !json_output {
            println!("Loading loans from data/sample_portfolio.csv...");
        }
        load_default_portfolio().expect("Failed to load portfolio")
    } else {
        if !json_output {
            println!("Loading loans from {}...", portfolio_path);
        }
        load_loans(&portfolio_path).expect("Failed to load portfolio")
    };

    if !json_output {
        println!("Loaded {} loans in {:?}", loans.len(), start.elapsed());
    }

    let charges = property_value
        .map(AncillaryCharges::standard)
        .unwrap_or_default();
    let discount_monthly = rates::monthly_effective_rate(
        discount_rate_pct,
        RateType::Effective,
        Compounding::Monthly,
    );
    let runner = SimulationRunner::with_charges(charges).with_discount_rate(discount_monthly);

    if !json_output {
        println!("Running simulations...");
    }
    let sim_start = Instant::now();

    // Run simulations in parallel; the engine is pure, so this needs no
    // synchronization.
    let outcomes: Vec<_> = loans
        .par_iter()
        .map(|terms| (terms, runner.run(terms)))
        .collect();

    if !json_output {
        println!("Simulations complete in {:?}", sim_start.elapsed());
    }

    let mut results: Vec<LoanIndicators> = Vec::with_capacity(outcomes.len());
    let mut rejected = 0usize;
    let mut total_principal = 0.0;

    for (terms, outcome) in outcomes {
        match outcome {
            Ok(sim) => {
                let summary = sim.schedule.summary();
                let ind = &sim.indicators;
                total_principal += terms.principal;
                results.push(LoanIndicators {
                    loan_id: terms.loan_id,
                    currency: terms.currency.code(),
                    principal: terms.principal,
                    term_months: terms.term_months,
                    irr_annual_pct: ind.irr_annual_pct,
                    tcea_all_in_pct: ind.tcea_all_in_pct,
                    tcea_interest_only_pct: ind.tcea_interest_only_pct,
                    npv: ind.npv,
                    total_interest: summary.total_interest,
                    total_charges: summary.total_charges,
                    converged: ind.irr_converged && ind.tcea_converged,
                });
            }
            Err(err) => {
                // Configuration errors are per-loan; surface them verbatim
                // and keep going with the rest of the portfolio.
                warn!("loan {} rejected: {}", terms.loan_id, err);
                rejected += 1;
            }
        }
    }

    let execution_time_ms = start.elapsed().as_millis() as u64;

    if json_output {
        let response = PortfolioResponse {
            loan_count: loans.len(),
            simulated: results.len(),
            rejected,
            discount_rate_pct,
            total_principal,
            results,
            execution_time_ms,
        };
        println!("{}", serde_json::to_string(&response).unwrap());
        return;
    }

    // Write per-loan indicators to CSV
    let output_path = "portfolio_indicators.csv";
    let mut file = File::create(output_path).expect("Failed to create output file");

    writeln!(
        file,
        "LoanID,Currency,Principal,TermMonths,IRRAnnualPct,TCEAAllInPct,TCEAInterestOnlyPct,NPV,TotalInterest,TotalCharges"
    )
    .unwrap();

    for r in &results {
        writeln!(
            file,
            "{},{},{:.2},{},{:.6},{:.6},{:.6},{:.2},{:.2},{:.2}",
            r.loan_id,
            r.currency,
            r.principal,
            r.term_months,
            r.irr_annual_pct,
            r.tcea_all_in_pct,
            r.tcea_interest_only_pct,
            r.npv,
            r.total_interest,
            r.total_charges,
        )
        .unwrap();
    }

    println!("Output written to {}", output_path);

    println!("\nPortfolio Summary:");
    println!("  Loans: {} ({} rejected)", loans.len(), rejected);
    println!("  Total principal: {:.2}", total_principal);
    if let Some(max) = results
        .iter()
        .max_by(|a, b| a.tcea_all_in_pct.total_cmp(&b.tcea_all_in_pct))
    {
        println!(
            "  Highest all-in TCEA: loan {} at {:.4}%",
            max.loan_id, max.tcea_all_in_pct
        );
    }

    println!("\nTotal time: {:?}", start.elapsed());
}
