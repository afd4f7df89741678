//! End-to-end weighing scenarios against the public API.

use pesagem_core::tolerance::{classify, ToleranceRate, ToleranceStatus};
use pesagem_core::units::{grams_to_kg, kg_to_grams, parse_decimal};
use pesagem_core::{validate, ItemRequirement, SubmittablePayload, ValidationError, WeighingDraft};

#[test]
fn parses_common_pt_br_inputs() {
    assert_eq!(parse_decimal("1.234,500"), 1234.5);
    assert_eq!(parse_decimal("0,5"), 0.5);
    assert_eq!(parse_decimal(""), 0.0);
    assert_eq!(parse_decimal("abc"), 0.0);
}

#[test]
fn grams_survive_a_trip_through_kilograms() {
    for g in (0..5_000).step_by(37) {
        let back = kg_to_grams(grams_to_kg(g as f64));
        assert!((back - g).abs() <= 1);
    }
}

#[test]
fn zero_requirement_never_rejects() {
    for total in [0.0, 0.5, 999.0, 1.0e9] {
        assert_eq!(classify(0.0, total).status, ToleranceStatus::Accepted);
    }
}

#[test]
fn first_weighing_that_hits_the_requirement_is_accepted() {
    let requirement = ItemRequirement::new(1000.0, 0.0);
    let draft = WeighingDraft::new(42, 7, "1,000", "0,500");

    let payload = validate(&draft, &requirement).unwrap();
    assert_eq!(
        payload,
        SubmittablePayload {
            tara_kg: 0.5,
            net_kg: 1.0,
            gross_kg: 1.5,
        }
    );
}

#[test]
fn weighing_that_overshoots_the_band_reports_the_numbers() {
    let requirement = ItemRequirement::new(1000.0, 900.0);
    let draft = WeighingDraft::new(42, 7, "0,200", "0,100");

    let err = validate(&draft, &requirement).unwrap_err();
    assert_eq!(
        err,
        ValidationError::OutOfTolerance {
            tolerance: ToleranceRate::default(),
            min_grams: 950.0,
            max_grams: 1050.0,
            proposed_total: 1100.0,
        }
    );
    assert!(err.to_string().contains("Limite: 950 g a 1.050 g"));
    assert!(err.to_string().contains("1.100 g"));
}

#[test]
fn empty_net_is_missing_weights() {
    let requirement = ItemRequirement::new(1000.0, 0.0);
    let draft = WeighingDraft::new(42, 7, "", "0,500");
    assert_eq!(
        validate(&draft, &requirement),
        Err(ValidationError::MissingWeights)
    );
}

#[test]
fn negative_net_is_not_positive() {
    let requirement = ItemRequirement::new(1000.0, 0.0);
    let draft = WeighingDraft::new(42, 7, "-1", "0,500");
    assert_eq!(
        validate(&draft, &requirement),
        Err(ValidationError::NetWeightNotPositive)
    );
}

#[test]
fn second_weighing_completes_the_item() {
    // 600 g already in, 420 g more lands at 1.020 g: above, within +5%
    let requirement = ItemRequirement::new(1000.0, 600.0);
    let draft = WeighingDraft::new(42, 7, "0,420", "1,2");

    let payload = validate(&draft, &requirement).unwrap();
    assert_eq!(payload.net_kg, 0.42);
    assert_eq!(payload.tara_kg, 1.2);
    assert_eq!(
        classify(1000.0, 1020.0).status,
        ToleranceStatus::AcceptedAboveRequirementWithinTolerance
    );
}
