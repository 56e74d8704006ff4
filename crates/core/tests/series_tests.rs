use chrono::NaiveDate;
use sipreel_core::common::Frequency;
use sipreel_core::series::entity::PriceSeries;
use sipreel_core::simulation::error::SimulationError;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// # Summary
/// 周末等缺口应由前一个观测日的价格向前填充。
#[test]
fn test_gaps_are_forward_filled() {
    let series = PriceSeries::from_observations(vec![
        (day(2024, 1, 5), Some(10.0)),
        (day(2024, 1, 8), Some(12.0)),
        (day(2024, 1, 9), None),
        (day(2024, 1, 10), Some(15.0)),
    ])
    .unwrap();

    let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
    // 5, 6, 7 (周末), 8, 9 (缺失), 10
    assert_eq!(prices, vec![10.0, 10.0, 10.0, 12.0, 12.0, 15.0]);
    assert_eq!(series.first_date(), Some(day(2024, 1, 5)));
    assert_eq!(series.last_date(), Some(day(2024, 1, 10)));

    for pair in series.points().windows(2) {
        assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
    }
}

#[test]
fn test_unsorted_input_and_duplicates() {
    let series = PriceSeries::from_observations(vec![
        (day(2024, 3, 3), Some(30.0)),
        (day(2024, 3, 1), Some(10.0)),
        (day(2024, 3, 1), Some(11.0)),
    ])
    .unwrap();

    let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![11.0, 11.0, 30.0]);
}

#[test]
fn test_leading_and_trailing_nulls_are_dropped() {
    let series = PriceSeries::from_observations(vec![
        (day(2024, 1, 1), None),
        (day(2024, 1, 2), Some(f64::NAN)),
        (day(2024, 1, 3), Some(5.0)),
        (day(2024, 1, 4), Some(6.0)),
        (day(2024, 1, 5), None),
    ])
    .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.first_date(), Some(day(2024, 1, 3)));
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let empty = PriceSeries::from_observations(vec![]);
    assert!(matches!(empty, Err(SimulationError::InvalidInput(_))));

    let all_null = PriceSeries::from_observations(vec![
        (day(2024, 1, 1), None),
        (day(2024, 1, 2), None),
    ]);
    assert!(matches!(all_null, Err(SimulationError::InvalidInput(_))));

    let zero_seed = PriceSeries::from_observations(vec![
        (day(2024, 1, 1), Some(0.0)),
        (day(2024, 1, 3), Some(4.0)),
    ]);
    assert!(matches!(zero_seed, Err(SimulationError::InvalidInput(_))));

    let negative = PriceSeries::from_observations(vec![(day(2024, 1, 1), Some(-1.0))]);
    assert!(matches!(negative, Err(SimulationError::InvalidInput(_))));
}

#[test]
fn test_resample_keeps_first_row_of_each_period() {
    // 2024-01-01 是周一
    let series = PriceSeries::from_observations(vec![
        (day(2024, 1, 1), Some(1.0)),
        (day(2024, 1, 8), Some(2.0)),
        (day(2024, 2, 1), Some(3.0)),
        (day(2024, 2, 10), Some(4.0)),
    ])
    .unwrap();

    let weekly = series.resample(Frequency::Weekly);
    assert_eq!(weekly[0].date, day(2024, 1, 1));
    assert_eq!(weekly[1].date, day(2024, 1, 8));
    assert_eq!(weekly[1].price, 2.0);

    let monthly = series.resample(Frequency::Monthly);
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[1].date, day(2024, 2, 1));
    assert_eq!(monthly[1].price, 3.0);

    assert_eq!(series.resample(Frequency::Daily).len(), series.len());
}

/// # Summary
/// 周期首日休市时，降采样应顺延到该周期第一个实际交易日，而不是沿用上一期的填充价格。
#[test]
fn test_resample_skips_forward_filled_period_openers() {
    // 2024-01-08 周一休市，2024-06-01 为周六
    let series = PriceSeries::from_observations(vec![
        (day(2024, 1, 5), Some(10.0)),
        (day(2024, 1, 9), Some(20.0)),
        (day(2024, 5, 31), Some(30.0)),
        (day(2024, 6, 3), Some(40.0)),
    ])
    .unwrap();

    let weekly = series.resample(Frequency::Weekly);
    assert_eq!(weekly[0].date, day(2024, 1, 5));
    assert_eq!(weekly[1].date, day(2024, 1, 9));
    assert_eq!(weekly[1].price, 20.0);
    // 1 月 15 日至 5 月 26 日之间的周没有任何观测，直接跳过
    assert_eq!(weekly[2].date, day(2024, 5, 31));
    assert_eq!(weekly.len(), 4);

    let monthly = series.resample(Frequency::Monthly);
    let dates: Vec<NaiveDate> = monthly.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![day(2024, 1, 5), day(2024, 5, 31), day(2024, 6, 3)]);
    assert_eq!(monthly[2].price, 40.0);

    // 逐日序列仍然保留填充
    let daily = series.resample(Frequency::Daily);
    assert_eq!(daily.len(), series.len());
    assert_eq!(daily[3].date, day(2024, 1, 8));
    assert_eq!(daily[3].price, 10.0);
}

#[test]
fn test_observed_points_exclude_filled_days() {
    let series = PriceSeries::from_observations(vec![
        (day(2024, 1, 5), Some(10.0)),
        (day(2024, 1, 6), None),
        (day(2024, 1, 8), Some(12.0)),
    ])
    .unwrap();

    assert_eq!(series.len(), 4);
    let observed = series.observed_points();
    assert_eq!(observed.len(), 2);
    assert_eq!(observed[1].date, day(2024, 1, 8));
}

/// # Summary
/// 反序列化必须经过与构造函数相同的校验。
#[test]
fn test_deserialize_validates_and_refills() {
    let json = r#"[{"date":"2024-01-05","price":10.0},{"date":"2024-01-08","price":12.0}]"#;
    let series: PriceSeries = serde_json::from_str(json).unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series.points()[2].price, 10.0);

    let encoded = serde_json::to_string(&series).unwrap();
    assert_eq!(encoded, json);

    let negative = r#"[{"date":"2024-01-05","price":-1.0}]"#;
    assert!(serde_json::from_str::<PriceSeries>(negative).is_err());
    assert!(serde_json::from_str::<PriceSeries>("[]").is_err());
}
