use ohlcv_indicators::price_frame::export::write_csv;
use ohlcv_indicators::price_frame::loader::read_prices_path;
use ohlcv_indicators::price_frame::utils::generate_test_data;
use ohlcv_indicators::{
    compute_indicators, compute_indicators_with, compute_many, IndicatorConfig, OutputKey,
    PriceSeries,
};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_csv_in_indicators_out() {
    let mut input = NamedTempFile::new().unwrap();
    writeln!(input, "timestamp,open,high,low,close,volume").unwrap();
    for (i, close) in [10.0, 10.5, 10.2, 10.8, 11.0].iter().enumerate() {
        writeln!(
            input,
            "2024-03-0{}T00:00:00Z,{close},{},{},{close},1000",
            i + 1,
            close + 0.5,
            close - 0.5
        )
        .unwrap();
    }

    let prices = read_prices_path(input.path()).unwrap();
    let set = compute_indicators(&prices);
    let mut out = Vec::new();
    write_csv(&set, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().nth(1).unwrap().starts_with("2024-03-01T00:00:00+00:00,10,"));
}

#[test]
fn test_config_file_drives_windows() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"rsi_window": 5, "sma_short": 10, "sma_long": 20}}"#).unwrap();
    let config = IndicatorConfig::from_path(file.path()).unwrap();

    let prices = PriceSeries::new(generate_test_data(30, 75.0, 0.04, 12)).unwrap();
    let set = compute_indicators_with(&prices, config).unwrap();

    assert_eq!(set.series(OutputKey::Rsi).unwrap().defined_count(), 25);
    assert_eq!(set.series(OutputKey::SmaShort).unwrap().defined_count(), 21);
    assert_eq!(set.series(OutputKey::SmaLong).unwrap().defined_count(), 11);
}

#[test]
fn test_tickers_are_independent() {
    let tickers: Vec<PriceSeries> = [(100.0, 1), (5.0, 2), (2_000.0, 3)]
        .into_iter()
        .map(|(start, seed)| PriceSeries::new(generate_test_data(60, start, 0.05, seed)).unwrap())
        .collect();

    let sets = compute_many(&tickers, &IndicatorConfig::default()).unwrap();

    for (prices, set) in tickers.iter().zip(&sets) {
        assert_eq!(set, &compute_indicators(prices));
        assert_eq!(set.len(), prices.len());
    }
}
