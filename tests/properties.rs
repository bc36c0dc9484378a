//! Property tests for the per-step cost and power invariants.

mod common;

use proptest::prelude::*;

use ppa_sim::sim::scenario::{scenario_as_is, scenario_with_ppa};
use ppa_sim::sim::types::RunInputs;
use ppa_sim::turbine::PowerCurve;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn power_stays_within_curve_bounds(v in 0.0f64..60.0) {
        let curve = PowerCurve::from_pairs(&[
            (3.0, 0.0),
            (6.0, 500_000.0),
            (12.0, 3_000_000.0),
            (25.0, 3_000_000.0),
        ]).unwrap();
        let p = curve.power_at(v);
        prop_assert!((0.0..=3_000_000.0).contains(&p));
    }

    #[test]
    fn power_is_monotone_in_wind(a in 0.0f64..30.0, b in 0.0f64..30.0) {
        let curve = common::flat_turbine().power_curve;
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(curve.power_at(lo) <= curve.power_at(hi));
    }

    #[test]
    fn with_ppa_splits_load_between_ppa_and_spot(
        load in 0.0f64..10.0,
        fleet in 0.0f64..10.0,
        price in -100.0f64..300.0,
        ppa in 0.0f64..120.0,
        m in 0.5f64..1.5,
    ) {
        let surplus = fleet - load;
        let with_ppa = scenario_with_ppa(load, fleet, surplus, price, ppa, m);
        let expected = if surplus >= 0.0 {
            load * ppa * m
        } else {
            (fleet * ppa + (load - fleet) * price) * m
        };
        prop_assert!(close(with_ppa, expected), "{with_ppa} vs {expected}");
    }

    #[test]
    fn without_fleet_both_costs_agree(
        load in 0.001f64..10.0,
        price in -100.0f64..300.0,
        m in 0.5f64..1.5,
    ) {
        let as_is = scenario_as_is(load, price, m);
        let with_ppa = scenario_with_ppa(load, 0.0, -load, price, 45.0, m);
        prop_assert!(close(as_is, with_ppa), "{as_is} vs {with_ppa}");
    }

    #[test]
    fn surplus_is_fleet_minus_load(
        load_kwh in 0.0f64..5000.0,
        turbines in 0u32..6,
        wind in 0.0f64..30.0,
    ) {
        let n = 3;
        let inputs = RunInputs {
            site: common::constant_site(n, wind, 50.0),
            profiles: vec![common::constant_plan(1, n, load_kwh, turbines)],
        };
        let out = common::default_engine().run(&inputs).unwrap();
        for r in &out.rows {
            prop_assert_eq!(r.fleet_power_mwh, r.power_mwh * f64::from(turbines));
            prop_assert!(close(r.ppa_surplus_mwh, r.fleet_power_mwh - r.load_mwh));
            prop_assert_eq!(r.scenarios.len(), 7);
        }
    }

    #[test]
    fn larger_multiplier_raises_both_costs(
        load in 0.01f64..10.0,
        fleet in 0.0f64..10.0,
        price in 1.0f64..300.0,
        ppa in 1.0f64..120.0,
        m1 in 0.5f64..1.5,
        delta in 0.001f64..0.5,
    ) {
        let m2 = m1 + delta;
        let surplus = fleet - load;
        prop_assert!(scenario_as_is(load, price, m1) < scenario_as_is(load, price, m2));
        prop_assert!(
            scenario_with_ppa(load, fleet, surplus, price, ppa, m1)
                < scenario_with_ppa(load, fleet, surplus, price, ppa, m2)
        );
    }
}
