// Walks through a single-series and a batch forecast with each naive strategy
use naive_forecast::config::{NaiveStrategy, QuantileMethod};
use naive_forecast::{EngineConfig, ForecastService, PredictRequest};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Naive forecast demo\n");

    let single: PredictRequest = serde_json::from_str(
        r#"{
            "history": [
                {"ts": "2024-01-29T00:00:00", "value": 101.0},
                {"ts": "2024-01-30T00:00:00", "value": 99.5},
                {"ts": "2024-01-31T00:00:00", "value": 103.2}
            ],
            "horizon": 3,
            "freq": "M",
            "quantile_levels": [0.1, 0.5, 0.9]
        }"#,
    )?;

    for strategy in [
        NaiveStrategy::Last,
        NaiveStrategy::First,
        NaiveStrategy::Mean,
        NaiveStrategy::Median,
    ] {
        let config = EngineConfig::default()
            .with_strategy(strategy)
            .with_quantile_method(QuantileMethod::Analytic);
        let response = ForecastService::new(&config).predict(single.clone())?;

        println!("=== Strategy: {} ===", strategy);
        for record in response.prediction.series()[0] {
            let band: Vec<String> = record
                .probabilistic_values
                .iter()
                .map(|(level, value)| format!("q{}={:.2}", level, value))
                .collect();
            println!("  {}  {:.2}  [{}]", record.ts, record.value, band.join(", "));
        }
    }

    let batch: PredictRequest = serde_json::from_str(
        r#"{
            "history": [
                [{"ts": "2024-06-01 09:00", "value": 5.0}, {"ts": "2024-06-01 09:15", "value": 6.0}],
                [{"ts": "2024-06-01 09:00", "value": 50.0}]
            ],
            "horizon": 2,
            "freq": "15T"
        }"#,
    )?;

    println!("\n=== Batch, Monte Carlo quantiles ===");
    let response = ForecastService::new(&EngineConfig::default()).predict(batch)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
