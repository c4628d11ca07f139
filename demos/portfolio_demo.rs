// demos/portfolio_demo.rs
use nalgebra::DMatrix;
use portfolio_mc::analytics;
use portfolio_mc::mc::engine::{EngineConfig, McEngine};
use portfolio_mc::output::{self, ExportConfig};
use portfolio_mc::portfolio::PortfolioConfig;
use portfolio_mc::rng::RngFactory;

fn main() {
    println!("Running portfolio-mc Monte Carlo Demo\n");

    // Five-stock JSE portfolio
    let portfolio = PortfolioConfig::new(
        vec![
            "CPI".to_string(),
            "FSR".to_string(),
            "NPN".to_string(),
            "ANG".to_string(),
            "IMP".to_string(),
        ],
        vec![0.25, 0.25, 0.20, 0.15, 0.15],
        vec![1200.0, 80.0, 3200.0, 300.0, 200.0],
        vec![0.15, 0.12, 0.18, 0.20, 0.22],
        vec![0.25, 0.18, 0.30, 0.35, 0.40],
        DMatrix::from_row_slice(
            5,
            5,
            &[
                1.00, 0.60, 0.40, 0.20, 0.15, //
                0.60, 1.00, 0.35, 0.18, 0.12, //
                0.40, 0.35, 1.00, 0.25, 0.20, //
                0.20, 0.18, 0.25, 1.00, 0.55, //
                0.15, 0.12, 0.20, 0.55, 1.00,
            ],
        ),
    )
    .expect("valid portfolio");

    let config = EngineConfig {
        n_simulations: 1_000_000,
        batch_size: 250_000,
        horizon_years: 1.0,
        seed: 42,
    };
    let seed = config.seed;
    let engine = McEngine::new(config).expect("valid configuration");

    println!("Portfolio: {:?}", portfolio.tickers());
    println!("Initial value: {:.2}", portfolio.initial_value());
    println!(
        "Simulations: {} in {} batches\n",
        engine.config().n_simulations,
        engine.n_batches()
    );

    let result = engine.run(&portfolio).expect("simulation succeeds");
    let m = &result.metrics;

    println!(
        "Completed in {:.2}s ({:.0} paths/sec)\n",
        result.elapsed_secs, result.paths_per_sec
    );

    println!("RETURN STATISTICS:");
    println!("  Mean Return:   {:>8.2}%", m.mean_return * 100.0);
    println!("  Median Return: {:>8.2}%", m.median_return * 100.0);
    println!("  Std Deviation: {:>8.2}%", m.std_return * 100.0);
    println!("  Sharpe Ratio:  {:>8.3}", m.sharpe_ratio);
    println!("  Skewness:      {:>8.3}", m.skewness);
    println!("  Kurtosis:      {:>8.3}", m.kurtosis);

    println!("\nVALUE AT RISK:");
    println!("  95%   VaR: {:>8.2}%", m.var_95 * 100.0);
    println!("  99%   VaR: {:>8.2}%", m.var_99 * 100.0);
    println!("  99.9% VaR: {:>8.2}%", m.var_999 * 100.0);

    println!("\nCONDITIONAL VaR (Expected Shortfall):");
    println!("  95%   CVaR: {:>8.2}%", m.cvar_95 * 100.0);
    println!("  99%   CVaR: {:>8.2}%", m.cvar_99 * 100.0);
    println!("  99.9% CVaR: {:>8.2}%", m.cvar_999 * 100.0);

    println!("\nPROBABILITIES:");
    println!("  Any Loss:    {:>8.2}%", m.prob_loss * 100.0);
    println!("  Loss > 20%:  {:>8.2}%", m.prob_loss_20 * 100.0);
    println!("  Any Profit:  {:>8.2}%", m.prob_profit * 100.0);
    println!("  Profit > 20%:{:>8.2}%", m.prob_profit_20 * 100.0);

    println!("\nPERCENTILE TABLE:");
    for row in m.percentile_table() {
        println!("  {:>3}%: {:>8.2}%", row.percentile, row.value * 100.0);
    }

    // Single-asset cross-check against the closed-form lognormal mean
    let analytic_mean = analytics::gbm_terminal_mean(1.0, 0.15, 1.0) - 1.0;
    println!(
        "\nAnalytic 1y return for CPI alone: {:.2}% (lognormal mean)",
        analytic_mean * 100.0
    );

    let factory = RngFactory::new(seed);
    match output::export_results("jse_portfolio", &result, &factory, ExportConfig::ALL) {
        Ok(files) => {
            println!("\nExported:");
            for f in files {
                println!("  {}", f);
            }
        }
        Err(e) => eprintln!("Export failed: {}", e),
    }
}
