//! Credit System CLI
//!
//! Command-line interface for simulating a single credit: prints the
//! payment plan and indicators, and writes the full schedule to CSV.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use credit_system::indicators::DEFAULT_OPPORTUNITY_COST_PCT;
use credit_system::{
    rates, AncillaryCharges, Compounding, LoanTerms, RateType, SimulationRunner,
};
use std::fs::File;
use std::io::Write;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RateTypeArg {
    Effective,
    Nominal,
}

impl From<RateTypeArg> for RateType {
    fn from(value: RateTypeArg) -> Self {
        match value {
            RateTypeArg::Effective => RateType::Effective,
            RateTypeArg::Nominal => RateType::Nominal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompoundingArg {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl From<CompoundingArg> for Compounding {
    fn from(value: CompoundingArg) -> Self {
        match value {
            CompoundingArg::Monthly => Compounding::Monthly,
            CompoundingArg::Quarterly => Compounding::Quarterly,
            CompoundingArg::Semiannual => Compounding::Semiannual,
            CompoundingArg::Annual => Compounding::Annual,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "credit_system",
    about = "Simulate a mortgage credit payment plan and its financial indicators"
)]
struct Args {
    /// Disbursed principal
    #[arg(long, default_value_t = 100_000.0)]
    principal: f64,

    /// Term in months
    #[arg(long, default_value_t = 240)]
    term: u32,

    /// Annual interest rate, percent
    #[arg(long, default_value_t = 7.5)]
    rate: f64,

    /// How the annual rate is quoted
    #[arg(long, value_enum, default_value_t = RateTypeArg::Effective)]
    rate_type: RateTypeArg,

    /// Compounding convention for nominal rates
    #[arg(long, value_enum, default_value_t = CompoundingArg::Monthly)]
    compounding: CompoundingArg,

    /// Total grace months (nothing collected, interest capitalizes)
    #[arg(long, default_value_t = 0)]
    grace_total: u32,

    /// Partial grace months (interest-only)
    #[arg(long, default_value_t = 0)]
    grace_partial: u32,

    /// Property value for the standard charge profile; omit for a bare plan
    #[arg(long)]
    property_value: Option<f64>,

    /// Discount rate for NPV, effective annual percent
    #[arg(long, default_value_t = DEFAULT_OPPORTUNITY_COST_PCT)]
    discount_rate: f64,

    /// Disbursement date (YYYY-MM-DD) for due-date stamping
    #[arg(long)]
    disbursement_date: Option<NaiveDate>,

    /// Output CSV path for the full schedule
    #[arg(long, default_value = "payment_plan.csv")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Credit System v0.1.0");
    println!("====================\n");

    let mut terms = LoanTerms::with_grace(
        1,
        args.principal,
        args.term,
        args.rate,
        args.rate_type.into(),
        args.compounding.into(),
        args.grace_total,
        args.grace_partial,
    );
    terms.disbursement_date = args.disbursement_date;

    println!("Credit: {}", terms.loan_id);
    println!("  Principal: {} {:.2}", terms.currency.code(), terms.principal);
    println!("  Term: {} months", terms.term_months);
    println!(
        "  Rate: {:.4}% {:?} ({:?} compounding)",
        terms.annual_rate_pct, terms.rate_type, terms.compounding
    );
    println!(
        "  Grace: {} total / {} partial",
        terms.total_grace_months, terms.partial_grace_months
    );
    println!("  Effective monthly rate: {:.6}%", terms.monthly_rate() * 100.0);
    println!();

    let charges = args
        .property_value
        .map(AncillaryCharges::standard)
        .unwrap_or_default();

    let discount_monthly = rates::monthly_effective_rate(
        args.discount_rate,
        RateType::Effective,
        Compounding::Monthly,
    );

    let runner = SimulationRunner::with_charges(charges).with_discount_rate(discount_monthly);
    let sim = runner.run(&terms).context("simulation failed")?;

    // Print header
    println!("Payment Plan ({} periods):", sim.schedule.periods.len());
    println!(
        "{:>5} {:>3} {:>14} {:>12} {:>12} {:>12} {:>14} {:>12}",
        "Per", "Ph", "Opening", "Interest", "Payment", "Principal", "Closing", "NetFlow"
    );
    println!("{}", "-".repeat(92));

    // Print first 24 periods to console
    for row in sim.schedule.periods.iter().take(24) {
        println!(
            "{:>5} {:>3} {:>14.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2} {:>12.2}",
            row.period,
            row.phase.code(),
            row.opening_balance,
            row.interest,
            row.payment,
            row.principal,
            row.closing_balance,
            row.net_flow,
        );
    }

    if sim.schedule.periods.len() > 24 {
        println!("... ({} more periods)", sim.schedule.periods.len() - 24);
    }

    // Write full plan to CSV
    let mut file = File::create(&args.output)
        .with_context(|| format!("unable to create {}", args.output))?;

    writeln!(
        file,
        "Period,Phase,DueDate,Opening,Interest,Payment,Principal,Closing,BalanceInsurance,PropertyInsurance,StatementFee,NetFlow"
    )?;

    for row in &sim.schedule.periods {
        writeln!(
            file,
            "{},{},{},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8}",
            row.period,
            row.phase.code(),
            row.due_date.map(|d| d.to_string()).unwrap_or_default(),
            row.opening_balance,
            row.interest,
            row.payment,
            row.principal,
            row.closing_balance,
            row.balance_insurance,
            row.property_insurance,
            row.statement_fee,
            row.net_flow,
        )?;
    }

    println!("\nFull plan written to: {}", args.output);

    // Print summary and indicators
    let summary = sim.schedule.summary();
    println!("\nSummary:");
    println!("  Total Interest: {:.2}", summary.total_interest);
    println!("  Total Principal: {:.2}", summary.total_principal);
    println!("  Total Charges: {:.2}", summary.total_charges);
    println!("  Total Paid: {:.2}", summary.total_paid);

    let ind = &sim.indicators;
    println!("\nIndicators:");
    println!("  NPV @ {:.4}% monthly: {:.2}", ind.discount_rate_monthly * 100.0, ind.npv);
    println!("  IRR (monthly): {:.6}%", ind.irr_monthly * 100.0);
    println!("  IRR (annual): {:.4}%", ind.irr_annual_pct);
    println!("  TCEA all-in: {:.4}%", ind.tcea_all_in_pct);
    println!("  TCEA interest-only: {:.4}%", ind.tcea_interest_only_pct);
    if !ind.irr_converged || !ind.tcea_converged {
        println!("  (warning: IRR search did not fully converge; values are best-effort)");
    }

    Ok(())
}
