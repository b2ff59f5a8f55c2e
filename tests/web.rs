use facility_sim::output_analysis::DayMetrics;
use facility_sim::simulator::WebExperiment;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[test]
#[wasm_bindgen_test]
fn json_configured_experiment_reports_every_day() {
    let config = r#"
{
    "simulationTime": 80.0,
    "iterations": 3,
    "seed": 5,
    "rejectionProbability": 0.0,
    "accidentProbability": 0.0
}"#;
    let mut experiment = WebExperiment::post_json(config);
    assert![!experiment.has_results()];
    experiment.run();
    assert![experiment.has_results()];
    let days: Vec<DayMetrics> = serde_json::from_str(&experiment.get_days_json()).unwrap();
    assert_eq!(3, days.len());
    days.iter().for_each(|day| {
        assert_eq!(day.accepted_products, day.total_products);
        assert![!day.accident];
    });
    let summary: serde_json::Value = serde_json::from_str(&experiment.get_summary_json()).unwrap();
    assert_eq!(3, summary["days"]);
    let series: serde_json::Value = serde_json::from_str(&experiment.get_series_json()).unwrap();
    assert_eq!(3, series["total_products"].as_array().unwrap().len());
    assert![experiment
        .get_report()
        .contains("Average values over 3 simulated days")];
}

#[test]
#[wasm_bindgen_test]
fn yaml_configured_experiment_matches_json() {
    let yaml = r#"
simulationTime: 60.0
iterations: 2
seed: 8
binCapacity: 2
"#;
    let json = r#"{"simulationTime": 60.0, "iterations": 2, "seed": 8, "binCapacity": 2}"#;
    let mut from_yaml = WebExperiment::post_yaml(yaml);
    let mut from_json = WebExperiment::post_json(json);
    assert_eq!(from_yaml.get_config_json(), from_json.get_config_json());
    from_yaml.run();
    from_json.run();
    assert_eq!(from_yaml.get_days_json(), from_json.get_days_json());
    assert![from_yaml.get_days_yaml().contains("accepted_products")];
    assert![from_yaml.get_summary_yaml().contains("accident_rate")];
    assert![from_yaml.get_series_yaml().contains("bottleneck_station")];
}
