// ── Remote list reconciliation ──
//
// The terminal's listing only says which MACs are in the filter table.
// It is authoritative for membership; local records are authoritative
// for everything else.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::model::{Device, MacAddress};

/// Reconcile `current` against a freshly fetched listing.
///
/// The result holds exactly one record per distinct fetched MAC, in
/// fetch order (first occurrence wins). A MAC already known keeps its
/// local record unchanged, id included. A new MAC is enabled and stamped
/// with `now`.
pub(crate) fn merge_fetched(
    current: &[Device],
    fetched: Vec<Device>,
    now: DateTime<Utc>,
) -> Vec<Device> {
    let known: HashMap<&MacAddress, &Device> =
        current.iter().map(|d| (d.mac_address(), d)).collect();
    let mut seen: HashSet<MacAddress> = HashSet::with_capacity(fetched.len());

    fetched
        .into_iter()
        .filter(|d| seen.insert(d.mac_address().clone()))
        .map(|mut fresh| match known.get(fresh.mac_address()) {
            Some(existing) => (*existing).clone(),
            None => {
                fresh.set_enabled(true, now);
                fresh
            }
        })
        .collect()
}
