use std::time::Duration;
use taskscope::analysis::{run_concurrent, AnalyzerConfig, SequentialAnalyzer};
use taskscope::export::TraceEventExporter;
use taskscope::telemetry::RuntimeTelemetry;
use taskscope_probes::{Probe, ProbeCatalog};

fn quick_config() -> AnalyzerConfig {
    AnalyzerConfig {
        settle_before: Duration::from_millis(5),
        settle_after: Duration::from_millis(5),
        ..AnalyzerConfig::default()
    }
}

#[tokio::test]
async fn test_sequential_trace_is_valid_json() {
    let catalog = ProbeCatalog::standard()
        .select(&["simple_task", "with_select"])
        .expect("Failed to select probes");
    let results = SequentialAnalyzer::new(RuntimeTelemetry::new(), quick_config()).run(&catalog).await;

    let exporter = TraceEventExporter::from_results(&results);
    assert_eq!(exporter.event_count(), 2);

    let mut buffer = Vec::new();
    exporter.export(&mut buffer).expect("Failed to export trace");

    let json_str = String::from_utf8(buffer).expect("Invalid UTF-8");
    let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("Invalid JSON");
    assert_eq!(parsed["displayTimeUnit"], "ms");

    let events = parsed["traceEvents"].as_array().expect("traceEvents is not an array");
    let spans: Vec<_> = events.iter().filter(|e| e["ph"] == "X").collect();
    assert_eq!(spans[0]["name"], "simple_task");
    assert_eq!(spans[1]["name"], "with_select");
    assert!(spans[1]["ts"].as_f64().unwrap() > spans[0]["ts"].as_f64().unwrap());
    assert_eq!(spans[0]["args"]["status"], "success");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_trace_has_one_lane_per_probe() {
    let mut catalog = ProbeCatalog::new();
    for name in ["a", "b", "c"] {
        catalog
            .register(Probe::new(name, || tokio::time::sleep(Duration::from_millis(20))))
            .unwrap();
    }
    let timings = run_concurrent(&catalog, None).await;

    let mut exporter = TraceEventExporter::new();
    for timing in &timings {
        exporter.add_timing(timing);
    }
    let mut buffer = Vec::new();
    exporter.export(&mut buffer).unwrap();

    let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
    let lanes: Vec<_> = parsed["traceEvents"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["ph"] == "M")
        .map(|e| e["args"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(lanes, vec!["a", "b", "c"]);
}
