use quant_worker::config::Config;
use quant_worker::engine::{Dispatcher, RequestSender, Worker, WorkerResponses};
use quant_worker::models::{Outcome, RequestEnvelope, RequestKind, ResponseEnvelope};
use quant_worker::traits::ResponseStream;
use serde_json::{json, Value};

fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.global.seed = Some(seed);
    config
}

fn spawn(seed: u64) -> (RequestSender, WorkerResponses) {
    let config = seeded_config(seed);
    Worker::spawn(Dispatcher::new(&config), &config)
}

async fn request(
    sender: &RequestSender,
    responses: &mut WorkerResponses,
    envelope: RequestEnvelope,
) -> ResponseEnvelope {
    sender.submit(envelope).await.unwrap();
    responses.next().await.unwrap()
}

#[tokio::test]
async fn test_unknown_kind_does_not_block_later_requests() {
    let (sender, mut responses) = spawn(1);

    let bad = request(
        &sender,
        &mut responses,
        RequestEnvelope::raw("NOT_A_REAL_KIND", json!({}), "bad-1"),
    )
    .await;
    assert_eq!(bad.outcome(), Outcome::Error);
    assert_eq!(bad.correlation_id(), "bad-1");
    assert!(!bad.error_message().unwrap().is_empty());

    let good = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(RequestKind::OptimizePortfolio, json!({"assets": [{"symbol": "X"}]}), "good-1"),
    )
    .await;
    assert_eq!(good.outcome(), Outcome::Success);
    assert_eq!(good.correlation_id(), "good-1");
}

#[tokio::test]
async fn test_malformed_payload_is_reported_and_isolated() {
    let (sender, mut responses) = spawn(2);

    let bad = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(RequestKind::SimulatePricePaths, json!({"iterations": "many"}), "m-1"),
    )
    .await;
    assert_eq!(bad.outcome(), Outcome::Error);
    assert!(bad.error_message().unwrap().contains("SIMULATE_PRICE_PATHS"));

    let good = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(RequestKind::SimulatePricePaths, json!({"iterations": 3, "timeHorizonDays": 2}), "m-2"),
    )
    .await;
    assert!(good.is_success());
}

#[tokio::test]
async fn test_oversized_simulation_is_reported_and_isolated() {
    let (sender, mut responses) = spawn(12);

    let bad = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(
            RequestKind::SimulatePricePaths,
            json!({"iterations": 1, "timeHorizonDays": 1e15}),
            "big-1",
        ),
    )
    .await;
    assert_eq!(bad.outcome(), Outcome::Error);
    assert_eq!(bad.correlation_id(), "big-1");
    assert!(bad.error_message().unwrap().contains("SIMULATE_PRICE_PATHS"));

    let good = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(
            RequestKind::SimulatePricePaths,
            json!({"iterations": 5.0, "timeHorizonDays": 1e1}),
            "big-2",
        ),
    )
    .await;
    assert!(good.is_success());
    let sim = good.result().unwrap().as_simulation().unwrap();
    assert_eq!(sim.iterations_run, 5);
    assert!(sim.paths.iter().all(|p| p.len() == 11));
}

#[tokio::test]
async fn test_zero_volatility_scenario() {
    let (sender, mut responses) = spawn(3);

    let response = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(
            RequestKind::SimulatePricePaths,
            json!({
                "initialValue": 1000000,
                "meanReturn": 0,
                "volatility": 0,
                "timeHorizonDays": 10,
                "iterations": 5
            }),
            "sim-flat",
        ),
    )
    .await;

    let sim = response.result().unwrap().as_simulation().unwrap();
    assert!(sim.paths.iter().flatten().all(|&v| v == 1_000_000.0));
    assert_eq!(sim.percentile5, 1_000_000.0);
    assert_eq!(sim.percentile50, 1_000_000.0);
    assert_eq!(sim.percentile95, 1_000_000.0);
    assert_eq!(sim.expected_value, 1_000_000.0);
    assert_eq!(sim.probability_of_loss, 0.0);
}

#[tokio::test]
async fn test_responses_follow_request_order() {
    let (sender, mut responses) = spawn(4);

    let kinds = [
        RequestKind::SimulatePricePaths,
        RequestKind::NormalizeAccountData,
        RequestKind::OptimizePortfolio,
    ];
    for i in 0..9 {
        let kind = kinds[i % kinds.len()];
        let payload = match kind {
            RequestKind::SimulatePricePaths => json!({"iterations": 50, "timeHorizonDays": 20}),
            _ => Value::Null,
        };
        sender
            .submit(RequestEnvelope::new(kind, payload, format!("req-{}", i)))
            .await
            .unwrap();
    }
    drop(sender);

    let mut ids = Vec::new();
    while let Some(response) = responses.next().await {
        assert!(response.is_success(), "{:?}", response.error_message());
        ids.push(response.correlation_id().to_string());
    }
    let expected: Vec<String> = (0..9).map(|i| format!("req-{}", i)).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_same_seed_reproduces_results() {
    let payload = json!({"initialValue": 5000, "iterations": 100, "timeHorizonDays": 30});
    let mut results = Vec::new();

    for _ in 0..2 {
        let (sender, mut responses) = spawn(42);
        let sim = request(
            &sender,
            &mut responses,
            RequestEnvelope::new(RequestKind::SimulatePricePaths, payload.clone(), "s"),
        )
        .await;
        let opt = request(
            &sender,
            &mut responses,
            RequestEnvelope::new(RequestKind::OptimizePortfolio, json!({}), "o"),
        )
        .await;
        results.push((sim.result().cloned(), opt.result().cloned()));
    }

    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_normalizer_through_worker() {
    let (sender, mut responses) = spawn(5);

    let response = request(
        &sender,
        &mut responses,
        RequestEnvelope::new(RequestKind::NormalizeAccountData, json!({"status": {}, "positions": {}}), "acct"),
    )
    .await;

    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["outcome"], json!("SUCCESS"));
    assert_eq!(value["correlationId"], json!("acct"));
    let result = &value["result"];
    assert_eq!(result["liquidity"], json!(0.0));
    assert_eq!(result["buyingPower"], json!(0.0));
    assert_eq!(result["dailyPL"], json!(0.0));
    assert_eq!(result["equity"], json!(0.0));
    assert_eq!(result["positions"], json!([]));
    assert!(result["lastUpdated"].is_string());
}

#[tokio::test]
async fn test_correlation_ids_are_echoed_verbatim() {
    let (sender, mut responses) = spawn(6);

    for id in ["", "  spaced  ", "ünïcödé-🚀", "{\"json\":true}"] {
        for kind in ["OPTIMIZE_PORTFOLIO", "NOT_A_REAL_KIND"] {
            let response = request(&sender, &mut responses, RequestEnvelope::raw(kind, json!({}), id)).await;
            assert_eq!(response.correlation_id(), id);
        }
    }
}
