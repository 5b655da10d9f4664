use proptest::prelude::*;
use qstat::{
    gray_codes, ks_statistic, possible_states, reference_distribution, total_variation_distance,
    Distribution,
};

fn distributions(n_bits: usize) -> impl Strategy<Value = Distribution> {
    proptest::collection::vec(0.0f64..1.0, 1 << n_bits).prop_map(move |weights| {
        let total: f64 = weights.iter().sum::<f64>().max(f64::MIN_POSITIVE);
        possible_states(n_bits)
            .into_iter()
            .zip(weights)
            .map(|(state, w)| (state, w / total))
            .collect()
    })
}

proptest! {
    #[test]
    fn tvd_is_symmetric(p in distributions(3), q in distributions(3)) {
        let forward = total_variation_distance(&p, &q, false);
        let backward = total_variation_distance(&q, &p, false);
        prop_assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn tvd_is_zero_on_itself_and_bounded(p in distributions(3), q in distributions(3)) {
        prop_assert_eq!(total_variation_distance(&p, &p, false), 0.0);
        let d = total_variation_distance(&p, &q, false);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&d));
    }

    #[test]
    fn percentage_flag_matches_prescaled_input(p in distributions(3), q in distributions(3)) {
        let percent: Distribution = p.iter().map(|(k, v)| (k.clone(), v * 100.0)).collect();
        let scaled = total_variation_distance(&percent, &q, true);
        let plain = total_variation_distance(&p, &q, false);
        prop_assert!((scaled - plain).abs() < 1e-9);
        let scaled = ks_statistic(&percent, &q, true);
        let plain = ks_statistic(&p, &q, false);
        prop_assert!((scaled - plain).abs() < 1e-9);
    }

    #[test]
    fn ks_statistic_is_bounded_by_tvd_range(p in distributions(2), q in distributions(2)) {
        let ks = ks_statistic(&p, &q, false);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&ks));
    }

    #[test]
    fn reference_distribution_always_sums_to_one(snr in 1.01f64..100.0) {
        let reference = reference_distribution(3, &["000", "111"], Some(snr)).unwrap();
        let total: f64 = reference.values().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn gray_codes_cover_every_state_once(n_bits in 1usize..8) {
        let mut codes = gray_codes(n_bits);
        codes.sort();
        prop_assert_eq!(codes, possible_states(n_bits));
    }
}
