//! Training and inference determinism.
//!
//! With the default settings there is no stochastic step anywhere:
//! two stores trained from the same table must agree bit-for-bit, and
//! repeated queries against one store must return identical vectors.

use durar::prelude::*;

fn all_bits(values: &[f32]) -> Vec<u32> {
    values.iter().map(|v| v.to_bits()).collect()
}

#[test]
fn independent_trainings_agree_bitwise() {
    let records = build_dataset();
    let a = ModelStore::train(&records).expect("training should succeed");
    let b = ModelStore::train(&records).expect("training should succeed");

    for attack in AttackType::ALL {
        let (_, sa) = predict_strength_curve(&a, 0.06, attack.as_str(), 365, 1).expect("curve");
        let (_, sb) = predict_strength_curve(&b, 0.06, attack.as_str(), 365, 1).expect("curve");
        assert_eq!(all_bits(&sa), all_bits(&sb), "strength curves for {attack}");

        let (_, wa) = predict_weight_curve(&a, 0.06, attack.as_str(), 365, 1).expect("curve");
        let (_, wb) = predict_weight_curve(&b, 0.06, attack.as_str(), 365, 1).expect("curve");
        assert_eq!(all_bits(&wa), all_bits(&wb), "weight curves for {attack}");
    }
}

#[test]
fn repeated_queries_are_bit_identical() {
    let records = build_dataset();
    let store = ModelStore::train(&records).expect("training should succeed");

    for _ in 0..3 {
        let (days, values) =
            predict_strength_curve(&store, 0.08, "chloride", 120, 1).expect("curve");
        let (days2, values2) =
            predict_strength_curve(&store, 0.08, "chloride", 120, 1).expect("curve");
        assert_eq!(days, days2);
        assert_eq!(all_bits(&values), all_bits(&values2));
    }

    let p1 = predict_point(&store, 0.02, 90, "acid").expect("prediction");
    let p2 = predict_point(&store, 0.02, 90, "acid").expect("prediction");
    assert_eq!(p1.to_bits(), p2.to_bits());
}

#[test]
fn seeded_ensembles_survive_their_seeds() {
    // The strength and weight ensembles are seeded independently (0
    // and 1). With subsampling disabled the seeds are inert, but they
    // must still round-trip through training so enabling subsampling
    // later never changes the procedure's shape.
    let records = build_dataset();
    let store = ModelStore::train(&records).expect("training should succeed");

    let strength = store
        .strength_model(AttackType::Sulphate)
        .expect("model present");
    let weight = store
        .weight_model(AttackType::Sulphate)
        .expect("model present");
    assert_eq!(strength.random_state(), Some(0));
    assert_eq!(weight.random_state(), Some(1));
}
