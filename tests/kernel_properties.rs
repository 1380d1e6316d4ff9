use quant_worker::optimizer::{optimize_portfolio, Asset, OptimizationParams, SharpeConfig};
use quant_worker::pricing::{simulate_price_paths, GbmConfig, SimulationParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_simulation_invariants_across_inputs() {
    let mut rng = StdRng::seed_from_u64(2024);
    let cases = [
        (1_000_000.0, 0.08, 0.15, 252.0, 1000.0),
        (100.0, -0.20, 0.60, 60.0, 300.0),
        (50_000.0, 0.30, 0.05, 5.0, 3.0),
        (1.0, 0.0, 1.2, 126.0, 200.0),
    ];

    for (initial_value, mean_return, volatility, time_horizon_days, iterations) in cases {
        let params = SimulationParams {
            initial_value,
            mean_return,
            volatility,
            time_horizon_days,
            iterations,
        };
        let result = simulate_price_paths(&params, &GbmConfig::default(), &mut rng).unwrap();

        let q = &result.quantiles;
        assert_eq!(q.p50.len(), time_horizon_days as usize + 1);
        for t in 0..q.p50.len() {
            assert!(q.p5[t] <= q.p50[t] && q.p50[t] <= q.p95[t], "band crossed at t={}", t);
        }

        assert!(result.percentile5 <= result.percentile50);
        assert!(result.percentile50 <= result.percentile95);
        assert!((0.0..=1.0).contains(&result.probability_of_loss));
        assert_eq!(result.iterations_run, iterations as usize);
        assert_eq!(result.paths.len(), (iterations as usize).min(50));
        assert!(result.paths.iter().all(|p| p.len() == time_horizon_days as usize + 1));
        assert!(result.paths.iter().all(|p| p[0] == initial_value));
    }
}

#[test]
fn test_optimizer_simplex_across_asset_counts() {
    let mut rng = StdRng::seed_from_u64(7);
    let config = SharpeConfig { search_iterations: 500 };

    for n in 1..=8 {
        let params = OptimizationParams {
            assets: (0..n).map(|i| Asset::new(format!("A{}", i))).collect(),
            risk_free_rate: 0.01,
        };
        let result = optimize_portfolio(&params, &config, &mut rng);

        assert_eq!(result.allocations.len(), n);
        let sum: f64 = result.allocations.iter().map(|a| a.allocation).sum();
        assert!((sum - 1.0).abs() < 1e-6, "n={} sum={}", n, sum);
        assert!(result
            .allocations
            .windows(2)
            .all(|w| w[0].allocation >= w[1].allocation));
    }
}
