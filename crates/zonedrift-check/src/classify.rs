//! Pure projections over the enumerated record set.

use std::collections::HashMap;

use zonedrift_core::{normalize_name, Delegation, ManagedAlias, RecordKind, RecordSet};

/// Project the NS record sets into delegations.
///
/// NS values are grouped by normalized record name; record sets sharing a
/// name contribute the union of their values. Output order follows the
/// first appearance of each name in the listing.
#[must_use]
pub fn delegations(records: &[RecordSet]) -> Vec<Delegation> {
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, Vec<String>> = HashMap::new();

    for rs in records.iter().filter(|r| r.kind == RecordKind::Ns) {
        let name = normalize_name(&rs.name);
        if !by_name.contains_key(&name) {
            order.push(name.clone());
        }
        by_name
            .entry(name)
            .or_default()
            .extend(rs.values.iter().cloned());
    }

    order
        .into_iter()
        .map(|name| {
            let nameservers = by_name.remove(&name).unwrap_or_default();
            Delegation::new(name, nameservers)
        })
        .collect()
}

/// Select records pointing at the managed platform.
///
/// A record qualifies when its first literal value or its alias target
/// contains the platform domain suffix.
#[must_use]
pub fn managed_aliases(records: &[RecordSet], platform_suffix: &str) -> Vec<ManagedAlias> {
    records
        .iter()
        .filter_map(|rs| {
            let target = rs
                .values
                .first()
                .or(rs.alias_target.as_ref())
                .filter(|v| v.contains(platform_suffix))?;
            Some(ManagedAlias {
                name: normalize_name(&rs.name),
                value: target.clone(),
                kind: rs.kind.clone(),
            })
        })
        .collect()
}
