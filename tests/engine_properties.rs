//! Property tests over random houses and readings.

use std::sync::Arc;

use homeload::appliance::{ApplianceId, ApplianceSet, ApplianceView, Priority, Status};
use homeload::capacity::CapacityLimits;
use homeload::engine::{self, Action};
use homeload::price::PriceBand;
use proptest::prelude::*;

fn arb_band() -> impl Strategy<Value = PriceBand> {
    prop_oneof![
        Just(PriceBand::Low),
        Just(PriceBand::Normal),
        Just(PriceBand::High)
    ]
}

fn arb_set() -> impl Strategy<Value = ApplianceSet> {
    prop::collection::vec(
        (-1i32..=4, prop::bool::ANY, 1u32..=4000),
        0..8,
    )
    .prop_map(|specs| {
        ApplianceSet::new(
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (tier, on, watts))| ApplianceView {
                    id: ApplianceId(i),
                    name: Arc::from(format!("a{i}")),
                    priority: Priority(tier),
                    status: if on { Status::On } else { Status::Off },
                    kilowatts: watts as f32 / 1000.0,
                })
                .collect(),
        )
    })
}

proptest! {
    #[test]
    fn evaluation_is_idempotent(
        band in arb_band(),
        set in arb_set(),
        active in 0.0f32..12.0,
        average in 0.0f32..12.0,
    ) {
        let reading = CapacityLimits::new(5.0, 5.0).reading(active, average).unwrap();
        prop_assert_eq!(
            engine::evaluate(band, &reading, &set),
            engine::evaluate(band, &reading, &set)
        );
    }

    #[test]
    fn starts_never_reach_the_load_ceiling(
        band in arb_band(),
        set in arb_set(),
        active in 0.0f32..12.0,
        average in 0.0f32..12.0,
    ) {
        let reading = CapacityLimits::new(5.0, 5.0).reading(active, average).unwrap();
        if let Some(intent) = engine::evaluate(band, &reading, &set) {
            let target = set.items().iter().find(|a| a.id == intent.appliance).unwrap();
            match intent.action {
                Action::Start => {
                    prop_assert_eq!(target.status, Status::Off);
                    prop_assert!(!reading.is_active_load_over_with(target.kilowatts));
                }
                Action::Stop => prop_assert_eq!(target.status, Status::On),
            }
        }
    }

    #[test]
    fn band_restricts_which_tiers_start(
        band in arb_band(),
        set in arb_set(),
        active in 0.0f32..12.0,
        average in 0.0f32..12.0,
    ) {
        let reading = CapacityLimits::new(5.0, 5.0).reading(active, average).unwrap();
        if let Some(intent) = engine::evaluate(band, &reading, &set) {
            let target = set.items().iter().find(|a| a.id == intent.appliance).unwrap();
            if intent.action == Action::Start {
                match band {
                    PriceBand::High => prop_assert!(target.priority.is_baseline()),
                    PriceBand::Normal => prop_assert!(!target.priority.is_special()),
                    PriceBand::Low => prop_assert!(
                        target.priority.is_special() || set.has_special_running()
                    ),
                }
            }
        }
    }

    #[test]
    fn normal_band_never_leaves_a_special_running(
        set in arb_set(),
        active in 0.0f32..12.0,
        average in 0.0f32..12.0,
    ) {
        let reading = CapacityLimits::new(5.0, 5.0).reading(active, average).unwrap();
        if set.has_special_running() {
            let intent = engine::evaluate(PriceBand::Normal, &reading, &set).unwrap();
            prop_assert_eq!(intent.action, Action::Stop);
            prop_assert!(set.items()[intent.appliance.0].priority.is_special());
        }
    }

    #[test]
    fn normal_active_is_the_first_of_the_highest_running_tier(set in arb_set()) {
        let expected = set
            .items()
            .iter()
            .filter(|a| a.status == Status::On && !a.priority.is_special())
            .map(|a| a.priority)
            .max()
            .and_then(|top| set.items().iter().find(|a| {
                a.status == Status::On && a.priority == top
            }))
            .map(|a| a.id);
        prop_assert_eq!(set.normal_active().map(|a| a.id), expected);
    }

    #[test]
    fn normal_inactive_is_the_first_of_the_lowest_idle_tier(set in arb_set()) {
        let expected = set
            .items()
            .iter()
            .filter(|a| a.status == Status::Off && !a.priority.is_special())
            .map(|a| a.priority)
            .min()
            .and_then(|bottom| set.items().iter().find(|a| {
                a.status == Status::Off && a.priority == bottom
            }))
            .map(|a| a.id);
        prop_assert_eq!(set.normal_inactive().map(|a| a.id), expected);
    }
}
