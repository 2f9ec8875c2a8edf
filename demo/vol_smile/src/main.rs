//! Volatility smile demo
//!
//! Prices a synthetic option chain off a known smile, inverts every quote
//! back to an implied volatility and prints one JSON object per strike.
//!
//! # Usage
//!
//! ```text
//! vol-smile --solver halley --strikes 41 --greeks
//! vol-smile --config implied_vol.toml
//! RUST_LOG=pricer_core=debug vol-smile
//! ```
//!
//! Logs go to stderr so stdout stays machine-readable.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pricer_core::math::solvers::{SolverKind, Termination};
use pricer_models::analytical::{price, Greeks};
use pricer_models::instruments::{OptionSide, Quote};
use pricer_optimiser::implied_vol::{solve_chain, ChainRow, ChainSummary, ImpliedVolConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Implied-volatility smile over a synthetic chain
#[derive(Parser, Debug)]
#[command(name = "vol-smile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Solver configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root finder, overriding the configuration file
    #[arg(short, long)]
    solver: Option<SolverKind>,

    /// Attach Greeks to each converged row
    #[arg(long)]
    greeks: bool,

    /// Spot price
    #[arg(long, default_value_t = 100.0)]
    spot: f64,

    /// Risk-free rate
    #[arg(long, default_value_t = 0.02)]
    rate: f64,

    /// Time to expiry in years
    #[arg(long, default_value_t = 0.5)]
    expiry: f64,

    /// At-the-money volatility
    #[arg(long, default_value_t = 0.2)]
    atm_vol: f64,

    /// Slope of the smile in log-moneyness
    #[arg(long, default_value_t = -0.1, allow_negative_numbers = true)]
    skew: f64,

    /// Curvature of the smile in log-moneyness
    #[arg(long, default_value_t = 0.6)]
    curvature: f64,

    /// Number of strikes between 60% and 140% of spot
    #[arg(long, default_value_t = 33)]
    strikes: usize,
}

/// Quadratic smile in log-moneyness.
#[derive(Debug, Clone, Copy)]
struct Smile {
    atm: f64,
    skew: f64,
    curvature: f64,
}

impl Smile {
    fn volatility(&self, spot: f64, strike: f64) -> f64 {
        let m = (strike / spot).ln();
        self.atm + self.skew * m + self.curvature * m * m
    }
}

/// One output line.
#[derive(Debug, Serialize)]
struct Row {
    strike: f64,
    side: OptionSide,
    price: f64,
    true_volatility: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    implied_volatility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    converged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    termination: Option<Termination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    greeks: Option<Greeks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Row {
    fn new(quote: &Quote, true_volatility: f64, row: &ChainRow) -> Self {
        let mut out = Self {
            strike: quote.strike,
            side: quote.side,
            price: quote.price,
            true_volatility,
            implied_volatility: None,
            converged: None,
            iterations: None,
            termination: None,
            greeks: None,
            error: None,
        };
        match row {
            Ok(result) => {
                out.implied_volatility = Some(result.volatility);
                out.converged = Some(result.converged());
                out.iterations = Some(result.solver.iterations);
                out.termination = Some(result.solver.termination);
                out.greeks = result.greeks;
            }
            Err(err) => out.error = Some(err.to_string()),
        }
        out
    }
}

/// Out-of-the-money quotes: puts below the spot, calls at and above.
fn synthetic_chain(cli: &Cli, smile: &Smile) -> Vec<(Quote, f64)> {
    let n = cli.strikes.max(2);
    (0..n)
        .map(|i| {
            let strike = cli.spot * (0.6 + 0.8 * i as f64 / (n - 1) as f64);
            let vol = smile.volatility(cli.spot, strike);
            let side = if strike < cli.spot {
                OptionSide::Put
            } else {
                OptionSide::Call
            };
            let premium = price(side, cli.spot, strike, cli.rate, cli.expiry, vol);
            let quote = Quote::new(cli.spot, strike, cli.rate, cli.expiry, premium, side);
            (quote, vol)
        })
        .collect()
}

fn load_config(cli: &Cli) -> Result<ImpliedVolConfig> {
    let mut config = match &cli.config {
        Some(path) => ImpliedVolConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ImpliedVolConfig::default(),
    };
    if let Some(solver) = cli.solver {
        config.solver = solver;
    }
    config.compute_greeks |= cli.greeks;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive("vol_smile=info".parse()?))
        .init();

    let config = load_config(&cli)?;
    info!(
        solver = %config.solver,
        tolerance = config.tolerance,
        max_iterations = config.max_iterations,
        derivative = ?config.derivative,
        "Vol smile demo starting"
    );

    let smile = Smile {
        atm: cli.atm_vol,
        skew: cli.skew,
        curvature: cli.curvature,
    };
    let chain = synthetic_chain(&cli, &smile);
    let quotes: Vec<Quote> = chain.iter().map(|(quote, _)| *quote).collect();

    let rows = solve_chain(&quotes, &config);
    let summary = ChainSummary::from_rows(&rows);

    let mut out = BufWriter::new(io::stdout().lock());
    for ((quote, vol), row) in chain.iter().zip(&rows) {
        serde_json::to_writer(&mut out, &Row::new(quote, *vol, row))?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        total = summary.total,
        converged = summary.converged,
        not_converged = summary.not_converged,
        diverged = summary.diverged,
        failed = summary.failed,
        "Vol smile demo finished"
    );

    Ok(())
}
