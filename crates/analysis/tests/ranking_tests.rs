//! Tests for top-N / bottom-N ranking.

use analysis::{rank_facilities, RankingMetric};
use atlas_common::{FacilityId, RankTier};
use test_utils::{facility, generate_facilities, scenario_facilities};

fn ids(set: &[atlas_common::RankedFacility]) -> Vec<&str> {
    set.iter().map(|r| r.facility.id.as_str()).collect()
}

// ============================================================================
// Scenario
// ============================================================================

#[test]
fn test_three_facility_scenario() {
    let rankings =
        rank_facilities(&scenario_facilities(), RankingMetric::AnnualGeneration, 2).unwrap();

    assert_eq!(ids(&rankings.top), vec!["1", "3"]);
    assert_eq!(rankings.top[0].rank, 1);
    assert_eq!(rankings.top[1].rank, 2);

    assert_eq!(ids(&rankings.bottom), vec!["2", "3"]);
    assert_eq!(rankings.bottom[0].rank, 1);
    assert_eq!(rankings.bottom[1].rank, 2);
}

#[test]
fn test_tiers_match_set() {
    let rankings =
        rank_facilities(&scenario_facilities(), RankingMetric::AnnualGeneration, 2).unwrap();
    assert!(rankings.top.iter().all(|r| r.tier == RankTier::Top));
    assert!(rankings.bottom.iter().all(|r| r.tier == RankTier::Bottom));
    assert!(rankings
        .top
        .iter()
        .chain(&rankings.bottom)
        .all(|r| r.rank >= 1 && r.rank <= 2));
}

#[test]
fn test_positions_of_facility_in_both_sets() {
    let rankings =
        rank_facilities(&scenario_facilities(), RankingMetric::AnnualGeneration, 2).unwrap();
    let id3 = FacilityId::new("3");
    assert_eq!(
        rankings.positions_of(&id3),
        vec![(RankTier::Top, 2), (RankTier::Bottom, 2)]
    );
    assert_eq!(rankings.tier_of(&id3), RankTier::Top);
    assert_eq!(rankings.tier_of(&FacilityId::new("2")), RankTier::Bottom);
    assert_eq!(rankings.tier_of(&FacilityId::new("99")), RankTier::Unranked);
}

// ============================================================================
// Sizes and disjointness
// ============================================================================

#[test]
fn test_set_sizes_are_min_of_n_and_total() {
    let facilities = generate_facilities(25, 11, (34.0, 38.0), (126.0, 129.0));
    for n in [1, 5, 12, 25, 40] {
        let r = rank_facilities(&facilities, RankingMetric::AnnualGeneration, n).unwrap();
        assert_eq!(r.top.len(), n.min(25), "n = {}", n);
        assert_eq!(r.bottom.len(), n.min(25), "n = {}", n);
    }
}

#[test]
fn test_sets_disjoint_when_n_at_most_half() {
    let facilities = generate_facilities(30, 3, (34.0, 38.0), (126.0, 129.0));
    for n in 1..=15 {
        let r = rank_facilities(&facilities, RankingMetric::AnnualGeneration, n).unwrap();
        for t in &r.top {
            assert!(
                r.bottom.iter().all(|b| b.facility.id != t.facility.id),
                "facility {} in both sets for n = {}",
                t.facility.id,
                n
            );
        }
    }
}

#[test]
fn test_fewer_than_n_returns_all_ranked() {
    let r = rank_facilities(&scenario_facilities(), RankingMetric::AnnualGeneration, 10).unwrap();
    assert_eq!(ids(&r.top), vec!["1", "3", "2"]);
    assert_eq!(ids(&r.bottom), vec!["2", "3", "1"]);
    assert_eq!(
        r.top.iter().map(|x| x.rank).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn test_zero_n_rejected() {
    let err =
        rank_facilities(&scenario_facilities(), RankingMetric::AnnualGeneration, 0).unwrap_err();
    assert_eq!(err.param, "ranking_n");
}

// ============================================================================
// Tie-breaking
// ============================================================================

#[test]
fn test_ties_break_by_ascending_id_regardless_of_input_order() {
    let forward = vec![
        facility("b", 200.0),
        facility("a", 200.0),
        facility("c", 200.0),
        facility("d", 50.0),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    for input in [&forward, &reversed] {
        let r = rank_facilities(input, RankingMetric::AnnualGeneration, 3).unwrap();
        assert_eq!(ids(&r.top), vec!["a", "b", "c"]);
        assert_eq!(ids(&r.bottom), vec!["d", "b", "c"]);
    }
}

#[test]
fn test_all_equal_values_stay_disjoint() {
    let input: Vec<_> = ["a", "b", "c", "d"].iter().map(|id| facility(id, 10.0)).collect();
    let r = rank_facilities(&input, RankingMetric::AnnualGeneration, 2).unwrap();
    assert_eq!(ids(&r.top), vec!["a", "b"]);
    assert_eq!(ids(&r.bottom), vec!["c", "d"]);
}

#[test]
fn test_numeric_ids_tie_break_numerically() {
    let input = vec![facility("10", 7.0), facility("9", 7.0), facility("100", 7.0)];
    let r = rank_facilities(&input, RankingMetric::AnnualGeneration, 3).unwrap();
    assert_eq!(ids(&r.top), vec!["9", "10", "100"]);
}

#[test]
fn test_generated_ranking_is_order_independent() {
    let facilities = generate_facilities(60, 99, (34.0, 38.0), (126.0, 129.0));
    let mut shuffled = facilities.clone();
    shuffled.rotate_left(17);
    shuffled.swap(3, 41);

    let a = rank_facilities(&facilities, RankingMetric::AnnualGeneration, 10).unwrap();
    let b = rank_facilities(&shuffled, RankingMetric::AnnualGeneration, 10).unwrap();
    assert_eq!(a, b);
}

// ============================================================================
// Other metrics
// ============================================================================

#[test]
fn test_capacity_factor_metric() {
    let mut small = facility("small", 8_760.0);
    small.capacity_mw = 2.0; // CF 0.5
    let mut big = facility("big", 17_520.0);
    big.capacity_mw = 10.0; // CF 0.2

    let r = rank_facilities(&[big, small], RankingMetric::CapacityFactor, 1).unwrap();
    assert_eq!(ids(&r.top), vec!["small"]);
    assert!((r.top[0].metric_value - 0.5).abs() < 1e-12);
    assert_eq!(ids(&r.bottom), vec!["big"]);
}
