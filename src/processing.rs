use crate::types::RecordStore;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Volcano,
    City,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Volcano => write!(f, "Volcanoes"),
            EntityKind::City => write!(f, "Cities"),
        }
    }
}

/// Markers of one kind for one country. `members` index into the matching
/// `RecordStore` vector, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryGroup {
    pub country: String,
    pub kind: EntityKind,
    pub members: Vec<usize>,
}

impl CountryGroup {
    pub fn label(&self) -> String {
        format!("{} - {}", self.country, self.kind)
    }
}

/// Result of grouping: the global layers plus the per-country ones, already
/// sorted by label.
#[derive(Debug, Clone)]
pub struct Grouping {
    pub all_volcanoes: Vec<usize>,
    pub admitted_cities: Vec<usize>,
    pub country_groups: Vec<CountryGroup>,
}

impl Grouping {
    /// Sorted, de-duplicated countries that own at least one group.
    pub fn country_names(&self) -> Vec<String> {
        self.country_groups
            .iter()
            .map(|g| g.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub fn group_records(store: &RecordStore, city_cap: usize) -> Grouping {
    let (all_volcanoes, volcano_groups) = group_volcanoes(store);
    let (admitted_cities, city_groups) = group_cities(store, city_cap);

    let country_groups = sort_groups(volcano_groups.into_iter().chain(city_groups).collect());

    info!(
        "Grouped {} volcanoes and {} of {} cities into {} country layers",
        all_volcanoes.len(),
        admitted_cities.len(),
        store.cities.len(),
        country_groups.len()
    );

    Grouping {
        all_volcanoes,
        admitted_cities,
        country_groups,
    }
}

fn group_volcanoes(store: &RecordStore) -> (Vec<usize>, Vec<CountryGroup>) {
    let mut by_country: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, v) in store.volcanoes.iter().enumerate() {
        by_country.entry(v.country.as_str()).or_default().push(i);
    }

    let all = (0..store.volcanoes.len()).collect();
    (all, into_groups(by_country, EntityKind::Volcano))
}

/// Admits at most `cap` cities per country, keeping the first ones in load order.
pub fn group_cities(store: &RecordStore, cap: usize) -> (Vec<usize>, Vec<CountryGroup>) {
    let mut by_country: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let mut admitted = Vec::new();

    for (i, c) in store.cities.iter().enumerate() {
        let members = by_country.entry(c.country.as_str()).or_default();
        if members.len() < cap {
            members.push(i);
            admitted.push(i);
        }
    }

    // A zero cap leaves empty entries behind.
    by_country.retain(|_, members| !members.is_empty());

    (admitted, into_groups(by_country, EntityKind::City))
}

fn into_groups(by_country: BTreeMap<&str, Vec<usize>>, kind: EntityKind) -> Vec<CountryGroup> {
    by_country
        .into_iter()
        .map(|(country, members)| CountryGroup {
            country: country.to_string(),
            kind,
            members,
        })
        .collect()
}

pub fn sort_groups(mut groups: Vec<CountryGroup>) -> Vec<CountryGroup> {
    groups.sort_by_cached_key(|g| g.label());
    groups
}

/// Number of city records dropped by the cap, per country.
pub fn truncated_cities(store: &RecordStore, cap: usize) -> BTreeMap<String, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for c in &store.cities {
        *counts.entry(c.country.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .filter(|(_, n)| *n > cap)
        .map(|(country, n)| (country.to_string(), n - cap))
        .collect()
}
