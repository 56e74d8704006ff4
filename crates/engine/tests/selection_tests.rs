use sipreel_core::config::SelectionConfig;
use sipreel_core::simulation::error::SimulationError;
use sipreel_engine::selection::{TickerSelector, load_exclusions};

fn candidates() -> Vec<String> {
    ["RELIANCE.NS", "TCS.NS", "INFY.NS", "AXISBANK.NS", "ITC.NS", "HDFCBANK.NS"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_exclusions_match_base_symbol() {
    let selector = TickerSelector::new(
        candidates(),
        vec!["axisbank".to_string(), "ITC".to_string()],
        7,
    );
    let available = selector.available();
    assert_eq!(available.len(), 4);
    assert!(!available.contains(&"AXISBANK.NS"));
    assert!(!available.contains(&"ITC.NS"));
}

#[test]
fn test_same_seed_same_pick() {
    let a = TickerSelector::new(candidates(), vec![], 42).pick(3).unwrap();
    let b = TickerSelector::new(candidates(), vec![], 42).pick(3).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 3);

    let mut symbols: Vec<&str> = a.iter().map(|t| t.symbol.as_str()).collect();
    symbols.sort();
    symbols.dedup();
    assert_eq!(symbols.len(), 3);
}

#[test]
fn test_not_enough_candidates() {
    let selector = TickerSelector::new(candidates(), vec!["TCS".to_string()], 1);
    let err = selector.pick(6).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidInput(_)));
}

#[tokio::test]
async fn test_load_exclusions() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = load_exclusions(&tmp.path().join("exclude.txt")).await.unwrap();
    assert!(missing.is_empty());

    let path = tmp.path().join("exclude.txt");
    std::fs::write(&path, "itc\n\n  tcs  \n").unwrap();
    let excluded = load_exclusions(&path).await.unwrap();
    assert_eq!(excluded, vec!["ITC".to_string(), "TCS".to_string()]);
}

#[test]
fn test_region_list_is_used_when_no_explicit_candidates() {
    let mut config = SelectionConfig::default();
    config.region = "India".to_string();
    config.regions.insert("india".to_string(), candidates());

    let selector = TickerSelector::from_config(&config, vec!["TCS".to_string()]).unwrap();
    let available = selector.available();
    assert_eq!(available.len(), 5);
    assert!(available.contains(&"ITC.NS"));
    assert!(!available.contains(&"TCS.NS"));
}

#[test]
fn test_explicit_candidates_override_region() {
    let mut config = SelectionConfig::default();
    config.candidates = vec!["AAPL".to_string(), "MSFT".to_string()];
    config.region = "nowhere".to_string();

    let selector = TickerSelector::from_config(&config, vec![]).unwrap();
    assert_eq!(selector.available(), vec!["AAPL", "MSFT"]);
}

#[test]
fn test_unknown_region_is_rejected() {
    let mut config = SelectionConfig::default();
    config.region = "mars".to_string();

    let err = TickerSelector::from_config(&config, vec![]).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidInput(msg) if msg.contains("mars")));
}
