//! Formatted outputs of every calculator, label by label.

use serde_json::{Value, json};
use wirelesscalc::config::{CalcConfig, ErlangMethod};
use wirelesscalc::{Fields, Response, Scenario};

fn fields(value: Value) -> Fields {
    value.as_object().cloned().expect("request must be an object")
}

fn metrics(scenario: Scenario, request: Value) -> Vec<(String, String)> {
    let response = scenario.compute(&fields(request), &CalcConfig::default());
    let report = response
        .report()
        .unwrap_or_else(|| panic!("{} failed: {:?}", scenario, response.error()));
    report
        .iter()
        .map(|(l, v)| (l.to_string(), v.to_string()))
        .collect()
}

fn expected(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(l, v)| (l.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_wireless_system_form_values() {
    let got = metrics(
        Scenario::WirelessSystem,
        json!({
            "bandwidth": "4000",
            "quantizerBits": "8",
            "sourceCoderRate": "0.25",
            "channelCoderRate": "0.5",
            "burstSizeBits": "2048"
        }),
    );
    assert_eq!(
        got,
        expected(&[
            ("Sampler Rate", "8,000 Sps"),
            ("Quantizer Rate", "64,000 bps"),
            ("Source Encoder Rate", "16,000 bps"),
            ("Channel Encoder Rate", "32,000 bps"),
            ("Interleaver Output Rate", "32,000 bps"),
            ("Burst Duration", "0.064000 s"),
        ])
    );
}

#[test]
fn test_wireless_system_wideband() {
    let got = metrics(
        Scenario::WirelessSystem,
        json!({
            "bandwidth": "20e6",
            "quantizerBits": "16",
            "sourceCoderRate": "1",
            "channelCoderRate": "0.75",
            "burstSizeBits": "100"
        }),
    );
    assert_eq!(got[2].1, "640,000,000 bps");
    assert_eq!(got[3].1, "853,333,333 bps");
    assert_eq!(got[4].1, "853,333,333 bps");
    assert_eq!(got[5].1, "0.000000 s");
}

#[test]
fn test_wireless_system_zero_code_rate() {
    let got = metrics(
        Scenario::WirelessSystem,
        json!({"channelCoderRate": 0, "bandwidth": 1e6, "quantizerBits": 12}),
    );
    assert_eq!(got[0].1, "2,000,000 Sps");
    assert_eq!(got[1].1, "24,000,000 bps");
    assert_eq!(got[3].1, "0 bps");
    assert_eq!(got[5].1, "0.000000 s");
}

#[test]
fn test_ofdm_form_values() {
    let got = metrics(
        Scenario::OfdmSystems,
        json!({
            "modulationOrder": "16",
            "rbBw": "180",
            "subcarrierSpacing": "15",
            "symbolsPerRb": "7",
            "parallelRbs": "100",
            "rbDurationMs": "0.5"
        }),
    );
    assert_eq!(
        got,
        expected(&[
            ("Bits per Symbol", "4.00"),
            ("Subcarriers per RB", "12.00"),
            ("Bits per RB", "336.00"),
            ("Maximum Data Rate", "67.20 Mbps"),
            ("Total Bandwidth", "18.00 MHz"),
            ("Spectral Efficiency", "3.73 bps/Hz"),
        ])
    );
}

#[test]
fn test_link_budget_form_values() {
    let got = metrics(
        Scenario::LinkBudget,
        json!({
            "dataRateBps": "1000000",
            "systemTempK": "290",
            "noiseFigureDb": "3",
            "ebNoDb": "10",
            "fadeMarginDb": "10",
            "pathLossDb": "120",
            "txGainDbi": "5",
            "rxGainDbi": "5",
            "otherLossesDb": "2"
        }),
    );
    assert_eq!(
        got,
        expected(&[
            ("Thermal Noise", "-143.98 dBW"),
            ("Receiver Sensitivity", "-130.98 dBW"),
            ("Required Receiver Power", "-90.98 dBm"),
            ("Required Transmitted Power", "0.1266 W"),
        ])
    );
}

#[test]
fn test_cellular_form_values() {
    let got = metrics(
        Scenario::CellularDesign,
        json!({
            "totalAreaSqkm": "1000",
            "cellRadiusKm": "2",
            "numSubscribers": "50000",
            "callsPerHour": "2",
            "callDurationMin": "1.5",
            "blockingProb": "0.02",
            "sirDb": "9",
            "pathLossExp": "4"
        }),
    );
    assert_eq!(
        got,
        expected(&[
            ("Number of Cells", "97"),
            ("Traffic per Cell", "25.77 Erlangs"),
            ("Channels per Cell (GoS)", "35"),
            ("Required Cluster Size (N)", "3"),
        ])
    );
}

#[test]
fn test_cellular_default_grade_of_service() {
    let got = metrics(
        Scenario::CellularDesign,
        json!({
            "totalAreaSqkm": 100,
            "cellRadiusKm": 1,
            "numSubscribers": 10000,
            "callsPerHour": 1,
            "callDurationMin": 3,
            "sirDb": 18
        }),
    );
    assert_eq!(
        got,
        expected(&[
            ("Number of Cells", "39"),
            ("Traffic per Cell", "12.82 Erlangs"),
            ("Channels per Cell (GoS)", "20"),
            ("Required Cluster Size (N)", "7"),
        ])
    );
}

#[test]
fn test_cellular_overload() {
    let got = metrics(
        Scenario::CellularDesign,
        json!({
            "totalAreaSqkm": "10",
            "cellRadiusKm": "10",
            "numSubscribers": "1000000",
            "callsPerHour": "10",
            "callDurationMin": "3"
        }),
    );
    assert_eq!(got[0].1, "1");
    assert_eq!(got[1].1, "500000.00 Erlangs");
    assert_eq!(got[2].1, "Not Found (High Traffic)");
    assert_eq!(got[3].1, "1");
}

#[test]
fn test_cellular_recursive_method_from_config() {
    let request = fields(json!({
        "totalAreaSqkm": 10,
        "cellRadiusKm": 10,
        "numSubscribers": 3200,
        "callsPerHour": 1,
        "callDurationMin": 3
    }));

    let direct = CalcConfig::default();
    let response = Scenario::CellularDesign.compute(&request, &direct);
    let report = response.report().unwrap();
    assert_eq!(report.get("Traffic per Cell"), Some("160.00 Erlangs"));
    assert_eq!(
        report.get("Channels per Cell (GoS)"),
        Some("Not Found (High Traffic)")
    );

    let mut recursive = CalcConfig::default();
    recursive.cellular.erlang_method = ErlangMethod::Recursive;
    let response = Scenario::CellularDesign.compute(&request, &recursive);
    assert_eq!(
        response.report().unwrap().get("Channels per Cell (GoS)"),
        Some("174")
    );
}

#[test]
fn test_all_defaults() {
    let config = CalcConfig::default();
    let json: Vec<Value> = Scenario::ALL
        .iter()
        .map(|s| serde_json::to_value(s.compute(&Fields::new(), &config)).unwrap())
        .collect();

    assert_eq!(
        json[0],
        json!({
            "Sampler Rate": "0 Sps",
            "Quantizer Rate": "0 bps",
            "Source Encoder Rate": "0 bps",
            "Channel Encoder Rate": "0 bps",
            "Interleaver Output Rate": "0 bps",
            "Burst Duration": "0.000000 s"
        })
    );
    assert_eq!(
        json[1],
        json!({
            "Bits per Symbol": "0.00",
            "Subcarriers per RB": "0.00",
            "Bits per RB": "0.00",
            "Maximum Data Rate": "0.00 Mbps",
            "Total Bandwidth": "0.00 MHz",
            "Spectral Efficiency": "0.00 bps/Hz"
        })
    );
    assert_eq!(
        json[2],
        json!({
            "Thermal Noise": "-999.00 dBW",
            "Receiver Sensitivity": "-999.00 dBW",
            "Required Receiver Power": "-969.00 dBm",
            "Required Transmitted Power": "0.0000 W"
        })
    );
    assert_eq!(
        json[3],
        json!({
            "Number of Cells": "0",
            "Traffic per Cell": "0.00 Erlangs",
            "Channels per Cell (GoS)": "0",
            "Required Cluster Size (N)": "1"
        })
    );
}

#[test]
fn test_all_zero_fields() {
    let config = CalcConfig::default();
    for scenario in Scenario::ALL {
        let defaults = scenario.defaults(&config);
        let zeroed: Fields = defaults
            .as_object()
            .unwrap()
            .keys()
            .map(|k| (k.clone(), json!(0)))
            .collect();
        let response = scenario.compute(&zeroed, &config);
        assert!(
            matches!(response, Response::Metrics(_)),
            "{}: {:?}",
            scenario,
            response
        );
    }
}

#[test]
fn test_invalid_field_yields_single_error() {
    let config = CalcConfig::default();
    let cases = [
        (Scenario::WirelessSystem, json!({"quantizerBits": "8.5"})),
        (Scenario::OfdmSystems, json!({"rbBw": "wide"})),
        (Scenario::LinkBudget, json!({"pathLossDb": [120]})),
        (Scenario::CellularDesign, json!({"numSubscribers": "lots"})),
    ];
    for (scenario, request) in cases {
        let value = serde_json::to_value(scenario.compute(&fields(request), &config)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1, "{}: {}", scenario, value);
        assert!(
            object["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid input or calculation error: field `"),
            "{}: {}",
            scenario,
            value
        );
    }
}

#[test]
fn test_deterministic() {
    let config = CalcConfig::default();
    let request = fields(json!({
        "totalAreaSqkm": "1000",
        "cellRadiusKm": "2",
        "numSubscribers": "50000",
        "callsPerHour": "2",
        "callDurationMin": "1.5",
        "sirDb": "9",
        "dataRateBps": "1e6",
        "modulationOrder": "64",
        "bandwidth": "4000"
    }));
    for scenario in Scenario::ALL {
        let first = scenario.compute(&request, &config);
        for _ in 0..3 {
            assert_eq!(scenario.compute(&request, &config), first);
        }
    }
}

#[test]
fn test_unrepresentable_results_become_error_records() {
    let config = CalcConfig::default();
    let cases = [
        (
            Scenario::CellularDesign,
            json!({"sirDb": "4000", "pathLossExp": "4"}),
            "Invalid input or calculation error: Required Cluster Size (N) is out of range (inf)",
        ),
        (
            Scenario::LinkBudget,
            json!({"dataRateBps": "1e6", "pathLossDb": "4000"}),
            "Invalid input or calculation error: Required Transmitted Power is out of range (inf)",
        ),
    ];
    for (scenario, request, message) in cases {
        let response = scenario.compute(&fields(request), &config);
        assert_eq!(response.error(), Some(message), "{}", scenario);
    }
}
