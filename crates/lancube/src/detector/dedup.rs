use super::fixture::FixtureRecord;

/// Visit order: brightest peak first; equal lux keeps input order.
fn order_by_lux(records: &[FixtureRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| records[b].lux.total_cmp(&records[a].lux));
    order
}

fn dedup_by_proximity(
    records: &[FixtureRecord],
    order: &[usize],
    radius_m: f64,
    require_same_side: bool,
) -> Vec<bool> {
    let mut keep = vec![true; records.len()];
    for (pos, &i) in order.iter().enumerate() {
        if !keep[i] {
            continue;
        }
        let pi = records[i].position();
        for &j in &order[pos + 1..] {
            if !keep[j] {
                continue;
            }
            if require_same_side && records[i].side != records[j].side {
                continue;
            }
            if pi.distance_m(records[j].position()) < radius_m {
                keep[j] = false;
            }
        }
    }
    keep
}

/// Remove duplicate fixtures: keep the brightest record within `radius_m`
/// of every suppressed one. Survivors stay in input order.
pub fn dedup_fixtures(
    records: Vec<FixtureRecord>,
    radius_m: f64,
    require_same_side: bool,
) -> Vec<FixtureRecord> {
    let order = order_by_lux(&records);
    let keep = dedup_by_proximity(&records, &order, radius_m, require_same_side);
    records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, k)| k.then_some(r))
        .collect()
}

/// Drop records sitting at instrument height within `radius_m` of a taller
/// record.
pub fn remove_shadowed_low(records: Vec<FixtureRecord>, radius_m: f64) -> Vec<FixtureRecord> {
    const EPS: f64 = 1e-9;
    let is_low = |r: &FixtureRecord| r.rise_m().abs() < EPS;
    let shadowed: Vec<bool> = records
        .iter()
        .map(|r| {
            is_low(r)
                && records.iter().any(|other| {
                    other.rise_m() > EPS && r.position().distance_m(other.position()) < radius_m
                })
        })
        .collect();
    records
        .into_iter()
        .zip(shadowed)
        .filter_map(|(r, s)| (!s).then_some(r))
        .collect()
}
