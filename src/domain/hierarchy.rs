// src/domain/hierarchy.rs

use std::collections::BTreeSet;

/// One (region, province, commune, village) tuple of reference data.
/// Fields are trimmed; an empty string means "no value".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HierarchyRow {
    pub region: String,
    pub province: String,
    pub commune: String,
    pub village: String,
}

impl HierarchyRow {
    pub fn new(region: &str, province: &str, commune: &str, village: &str) -> Self {
        Self {
            region: region.trim().to_string(),
            province: province.trim().to_string(),
            commune: commune.trim().to_string(),
            village: village.trim().to_string(),
        }
    }

    fn value(&self, level: LocationLevel) -> &str {
        match level {
            LocationLevel::Region => &self.region,
            LocationLevel::Province => &self.province,
            LocationLevel::Commune => &self.commune,
            LocationLevel::Village => &self.village,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationLevel {
    Region,
    Province,
    Commune,
    Village,
}

impl LocationLevel {
    pub const ALL: [LocationLevel; 4] = [
        LocationLevel::Region,
        LocationLevel::Province,
        LocationLevel::Commune,
        LocationLevel::Village,
    ];

    /// Form field name of this level.
    pub fn field(&self) -> &'static str {
        match self {
            LocationLevel::Region => "region",
            LocationLevel::Province => "province",
            LocationLevel::Commune => "commune",
            LocationLevel::Village => "village_name",
        }
    }

    pub fn parse(raw: &str) -> Option<LocationLevel> {
        match raw.trim() {
            "region" => Some(LocationLevel::Region),
            "province" => Some(LocationLevel::Province),
            "commune" => Some(LocationLevel::Commune),
            "village" | "village_name" => Some(LocationLevel::Village),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LocationLevel::Region => "الجهة",
            LocationLevel::Province => "الإقليم",
            LocationLevel::Commune => "الجماعة",
            LocationLevel::Village => "اسم الدوار المتضرر",
        }
    }
}

/// Cascading lookup over the administrative hierarchy.
///
/// Every query takes the values chosen at the ancestor levels (an empty
/// ancestor does not constrain) plus the text typed so far at the queried
/// level. Matching is case-sensitive substring containment. Results are
/// distinct, non-empty and sorted ascending.
#[derive(Debug, Clone, Default)]
pub struct HierarchyIndex {
    rows: Vec<HierarchyRow>,
}

impl HierarchyIndex {
    pub fn new(rows: Vec<HierarchyRow>) -> Self {
        let rows = rows
            .into_iter()
            .map(|r| HierarchyRow::new(&r.region, &r.province, &r.commune, &r.village))
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when at least one row carries a value at `level`.
    pub fn has_level(&self, level: LocationLevel) -> bool {
        self.rows.iter().any(|r| !r.value(level).is_empty())
    }

    pub fn regions(&self, filter: &str) -> Vec<String> {
        self.candidates(LocationLevel::Region, &[], filter)
    }

    pub fn provinces(&self, region: &str, filter: &str) -> Vec<String> {
        self.candidates(
            LocationLevel::Province,
            &[(LocationLevel::Region, region)],
            filter,
        )
    }

    pub fn communes(&self, region: &str, province: &str, filter: &str) -> Vec<String> {
        self.candidates(
            LocationLevel::Commune,
            &[
                (LocationLevel::Region, region),
                (LocationLevel::Province, province),
            ],
            filter,
        )
    }

    pub fn villages(&self, region: &str, province: &str, commune: &str, filter: &str) -> Vec<String> {
        self.candidates(
            LocationLevel::Village,
            &[
                (LocationLevel::Region, region),
                (LocationLevel::Province, province),
                (LocationLevel::Commune, commune),
            ],
            filter,
        )
    }

    /// Candidates for `level` under the ancestors already chosen in `selection`.
    pub fn options_for(&self, level: LocationLevel, selection: &LocationSelection, filter: &str) -> Vec<String> {
        match level {
            LocationLevel::Region => self.regions(filter),
            LocationLevel::Province => self.provinces(&selection.region, filter),
            LocationLevel::Commune => {
                self.communes(&selection.region, &selection.province, filter)
            }
            LocationLevel::Village => self.villages(
                &selection.region,
                &selection.province,
                &selection.commune,
                filter,
            ),
        }
    }

    fn candidates(
        &self,
        level: LocationLevel,
        ancestors: &[(LocationLevel, &str)],
        filter: &str,
    ) -> Vec<String> {
        let distinct: BTreeSet<&str> = self
            .rows
            .iter()
            .filter(|row| {
                ancestors.iter().all(|(ancestor, chosen)| {
                    let chosen = chosen.trim();
                    chosen.is_empty() || row.value(*ancestor) == chosen
                })
            })
            .map(|row| row.value(level))
            .filter(|value| !value.is_empty() && value.contains(filter))
            .collect();

        distinct.into_iter().map(str::to_string).collect()
    }
}

/// Values chosen so far in the location picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSelection {
    pub region: String,
    pub province: String,
    pub commune: String,
    pub village: String,
}

impl LocationSelection {
    pub fn get(&self, level: LocationLevel) -> &str {
        match level {
            LocationLevel::Region => &self.region,
            LocationLevel::Province => &self.province,
            LocationLevel::Commune => &self.commune,
            LocationLevel::Village => &self.village,
        }
    }

    fn slot(&mut self, level: LocationLevel) -> &mut String {
        match level {
            LocationLevel::Region => &mut self.region,
            LocationLevel::Province => &mut self.province,
            LocationLevel::Commune => &mut self.commune,
            LocationLevel::Village => &mut self.village,
        }
    }

    /// Sets `level` and, when the value actually changes, clears every
    /// level below it.
    pub fn select(&mut self, level: LocationLevel, value: &str) {
        let value = value.trim();
        if self.get(level) == value {
            return;
        }
        *self.slot(level) = value.to_string();
        for deeper in LocationLevel::ALL.into_iter().filter(|l| *l > level) {
            self.slot(deeper).clear();
        }
    }

    pub fn select_region(&mut self, region: &str) {
        self.select(LocationLevel::Region, region);
    }

    pub fn select_province(&mut self, province: &str) {
        self.select(LocationLevel::Province, province);
    }

    pub fn select_commune(&mut self, commune: &str) {
        self.select(LocationLevel::Commune, commune);
    }

    pub fn select_village(&mut self, village: &str) {
        self.select(LocationLevel::Village, village);
    }
}
