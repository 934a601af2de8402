use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Topic,
    Sector,
    Region,
    Pestle,
    Source,
    Country,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Topic,
        Facet::Sector,
        Facet::Region,
        Facet::Pestle,
        Facet::Source,
        Facet::Country,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Facet::Topic => "topic",
            Facet::Sector => "sector",
            Facet::Region => "region",
            Facet::Pestle => "pestle",
            Facet::Source => "source",
            Facet::Country => "country",
        }
    }

    pub fn value(self, record: &Record) -> Option<&str> {
        let field = match self {
            Facet::Topic => &record.topic,
            Facet::Sector => &record.sector,
            Facet::Region => &record.region,
            Facet::Pestle => &record.pestle,
            Facet::Source => &record.source,
            Facet::Country => &record.country,
        };

        field.as_deref()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Selected value per facet. An empty string is the "unset" sentinel and is
/// never stored; it reads back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected: [Option<String>; 6],
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, facet: Facet, value: impl Into<String>) {
        let value = value.into();

        self.selected[facet.index()] = if value.is_empty() { None } else { Some(value) };
    }

    pub fn clear(&mut self, facet: Facet) {
        self.selected[facet.index()] = None;
    }

    pub fn reset(&mut self) {
        self.selected = Default::default();
    }

    pub fn get(&self, facet: Facet) -> Option<&str> {
        self.selected[facet.index()].as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.iter().all(Option::is_none)
    }

    pub fn active(&self) -> impl Iterator<Item = (Facet, &str)> {
        Facet::ALL
            .into_iter()
            .filter_map(|facet| self.get(facet).map(|value| (facet, value)))
    }
}

pub fn matches(record: &Record, filters: &FilterState) -> bool {
    filters
        .active()
        .all(|(facet, wanted)| facet.value(record) == Some(wanted))
}

pub fn apply(records: &[Record], filters: &FilterState) -> Vec<Record> {
    records
        .iter()
        .filter(|record| matches(record, filters))
        .cloned()
        .collect()
}
