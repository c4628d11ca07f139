// scripts/benchmark.rs
use nalgebra::DMatrix;
use portfolio_mc::math_utils::Timer;
use portfolio_mc::mc::engine::{EngineConfig, McEngine};
use portfolio_mc::portfolio::PortfolioConfig;
use std::fs::File;
use std::io::Write;

fn benchmark_portfolio() -> PortfolioConfig {
    PortfolioConfig::new(
        vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
            "E".to_string(),
        ],
        vec![0.2; 5],
        vec![100.0; 5],
        vec![0.10; 5],
        vec![0.20; 5],
        DMatrix::from_row_slice(
            5,
            5,
            &[
                1.00, 0.30, 0.30, 0.30, 0.30, //
                0.30, 1.00, 0.30, 0.30, 0.30, //
                0.30, 0.30, 1.00, 0.30, 0.30, //
                0.30, 0.30, 0.30, 1.00, 0.30, //
                0.30, 0.30, 0.30, 0.30, 1.00,
            ],
        ),
    )
    .expect("valid benchmark portfolio")
}

fn main() {
    println!("portfolio-mc batch-size sweep");
    println!("CPU cores: {}", num_cpus::get());
    println!("Rayon threads: {}", rayon::current_num_threads());
    println!();

    let portfolio = benchmark_portfolio();
    let n_simulations = 1_000_000;
    let batch_sizes = [50_000usize, 100_000, 250_000, 500_000, 1_000_000];

    let mut rows: Vec<(usize, f64, f64, f64)> = Vec::new();

    for &batch_size in &batch_sizes {
        let engine = McEngine::new(EngineConfig {
            n_simulations,
            batch_size,
            horizon_years: 1.0,
            seed: 42,
        })
        .expect("valid configuration");

        let mut timer = Timer::new();
        timer.start();
        let result = engine.run(&portfolio).expect("simulation succeeds");
        let elapsed = timer.elapsed_ms() / 1000.0;
        let paths_per_sec = n_simulations as f64 / elapsed;

        println!(
            "batch_size {:>9}: {:>6.2}s  {:>12.0} paths/sec  VaR95 {:.4}",
            batch_size, elapsed, paths_per_sec, result.metrics.var_95
        );

        rows.push((batch_size, elapsed, paths_per_sec, result.metrics.var_95));
    }

    let mut file = File::create("benchmark_results.csv").expect("could not create file");
    writeln!(file, "batch_size,elapsed_secs,paths_per_sec,var_95").expect("could not write header");
    for (batch_size, elapsed, pps, var_95) in rows {
        writeln!(file, "{},{:.3},{:.0},{:.6}", batch_size, elapsed, pps, var_95)
            .expect("could not write row");
    }
    println!("\nResults written to benchmark_results.csv");
}
