use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::{
    DeductionKind, IncomeCategory, IncomeSubtype, TaxEngine, TaxRequest, TaxResult,
    TaxYearRegistry, ValidationError,
};
use tax_data::{TaxBracketLoader, apply_brackets, load_tax_year_config, logging};
use tracing::{info, warn};

/// Compute personal income tax and the saving from extra deductions.
#[derive(Parser, Debug)]
#[command(name = "tax-calc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log computation steps to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(flatten)]
    year: YearArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct YearArgs {
    /// Tax year to compute under
    #[arg(short, long, global = true, default_value_t = 2025)]
    year: i32,

    /// TOML file with a complete tax year configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// CSV file with columns tax_year,upper_bound,rate replacing the schedule
    #[arg(short, long, global = true)]
    brackets: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the liability for one income source
    Compute(RequestArgs),

    /// Tax saved by deducting AMOUNT from a taxable base
    Saving {
        /// Taxable income before the extra deduction
        #[arg(long)]
        base: Decimal,

        /// Hypothetical extra deduction
        #[arg(long)]
        amount: Decimal,
    },

    /// Compute the liability, then price the suggested investment tiers
    Plan {
        #[command(flatten)]
        request: RequestArgs,

        /// Percentage split applied to every tier (repeatable, e.g. --split 50 --split 50)
        #[arg(long = "split")]
        splits: Vec<Decimal>,
    },
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Gross income for the year
    #[arg(short, long)]
    gross: Decimal,

    /// Income category, by name (wages) or section (40(1))
    #[arg(long, default_value = "wages", value_parser = parse_category)]
    category: IncomeCategory,

    /// Profession or business subtype, e.g. medical or entertainment
    #[arg(long)]
    subtype: Option<String>,

    /// Declared actual expenses instead of the standard deduction
    #[arg(long)]
    actual_expenses: Option<Decimal>,

    /// Personal deduction as kind=amount (repeatable)
    #[arg(short, long = "deduction", value_parser = parse_deduction)]
    deductions: Vec<(DeductionKind, Decimal)>,
}

fn parse_category(s: &str) -> Result<IncomeCategory, String> {
    IncomeCategory::parse(s).ok_or_else(|| {
        let known: Vec<_> = IncomeCategory::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category '{s}'; expected one of {known:?}")
    })
}

fn parse_deduction(s: &str) -> Result<(DeductionKind, Decimal), String> {
    let (kind, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected kind=amount, got '{s}'"))?;
    let kind =
        DeductionKind::parse(kind).ok_or_else(|| format!("unknown deduction kind '{kind}'"))?;
    let amount = amount
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid amount '{amount}': {e}"))?;
    Ok((kind, amount))
}

fn build_engine(args: &YearArgs) -> Result<TaxEngine> {
    let mut config = match &args.config {
        Some(path) => {
            let config = load_tax_year_config(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            if config.tax_year != args.year {
                warn!(
                    file_year = config.tax_year,
                    requested_year = args.year,
                    "config file year differs from --year; using the file"
                );
            }
            config
        }
        None => TaxYearRegistry::builtin()
            .get(args.year)
            .context("No built-in configuration")?
            .config()
            .clone(),
    };

    if let Some(path) = &args.brackets {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let table = TaxBracketLoader::load_year(file, config.tax_year)
            .with_context(|| format!("Failed to load brackets: {}", path.display()))?;
        config = apply_brackets(config, table);
    }

    info!(tax_year = config.tax_year, "configuration ready");
    Ok(TaxEngine::new(config))
}

fn build_request(
    engine: &TaxEngine,
    args: &RequestArgs,
) -> Result<TaxRequest> {
    let mut request = TaxRequest::new(args.gross, args.category);

    if let Some(subtype) = &args.subtype {
        let parsed = IncomeSubtype::parse_for(args.category, subtype)
            .with_context(|| format!("Unknown subtype '{subtype}'"))?;
        request = request.with_subtype(parsed);
    }
    if let Some(amount) = args.actual_expenses {
        request = request.with_actual_expenses(amount);
    }
    for &(kind, amount) in &args.deductions {
        request = request.with_deduction(engine.line_item(kind, amount)?);
    }

    Ok(request)
}

fn compute(
    engine: &TaxEngine,
    args: &RequestArgs,
) -> Result<TaxResult> {
    let request = build_request(engine, args)?;

    match engine.compute_tax(&request) {
        Ok(result) => Ok(result),
        Err(ValidationError::DeductionLimitViolation(violations)) => {
            for v in &violations {
                println!(
                    "  {:<28} declared {:>12}  limit {:>12}  excess {:>12}",
                    v.name, v.declared, v.legal_max, v.excess
                );
            }
            bail!("{} deduction(s) exceed their statutory limit", violations.len())
        }
        Err(e) => Err(e).context("Failed to compute tax"),
    }
}

fn print_result(
    engine: &TaxEngine,
    result: &TaxResult,
) {
    println!("Tax year {}", engine.tax_year());
    println!("  Gross income        {:>14}", result.gross_income);
    println!("  Expense deduction   {:>14}", result.expense_deduction);
    println!("  Personal deductions {:>14}", result.total_deductions);
    println!("  Taxable income      {:>14}", result.taxable_income);
    println!("  Progressive tax     {:>14}", result.progressive_tax);
    println!("  Minimum tax         {:>14}", result.minimum_tax);
    println!("  Tax payable         {:>14}  ({:?})", result.tax_amount, result.method);
    println!("  Effective rate      {:>13}%", result.effective_rate_percent());
    println!(
        "  Marginal rate       {:>13}%",
        engine.marginal_rate(result.taxable_income) * Decimal::ONE_HUNDRED
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let engine = build_engine(&cli.year)?;

    match &cli.command {
        Command::Compute(args) => {
            let result = compute(&engine, args)?;
            print_result(&engine, &result);
        }
        Command::Saving { base, amount } => {
            let breakdown = engine.saving_breakdown(*base, *amount);
            println!("Tax before          {:>14}", breakdown.tax_before);
            println!("Tax after           {:>14}", breakdown.tax_after);
            println!("Effective deduction {:>14}", breakdown.effective_deduction);
            println!("Tax saving          {:>14}", breakdown.saving);
        }
        Command::Plan { request, splits } => {
            let result = compute(&engine, request)?;
            print_result(&engine, &result);

            let plan = engine.plan_savings(&result);
            if plan.is_empty() {
                println!("No investment tiers defined for tax year {}.", engine.tax_year());
            }
            for (index, tier) in plan.iter().enumerate() {
                println!(
                    "Plan {}: invest {:>10}  saves {:>10}",
                    index + 1,
                    tier.investment,
                    tier.tax_saving
                );
                for allocation in engine.distribute(tier, splits)? {
                    println!(
                        "    {:>6}%  invest {:>10}  saves {:>10}",
                        allocation.percentage, allocation.investment, allocation.tax_saving
                    );
                }
            }
        }
    }

    Ok(())
}
