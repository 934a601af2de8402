//! # Aggregation
//!
//! Reductions from the filtered subset to the datasets each chart consumes.
//!
//! - Intensity histogram: bucket by `f64::round` (nearest integer, halves
//!   away from zero), ascending, no zero-filled buckets
//! - Region pie and topic bars: top ten groups by count, ties kept in the order
//!   the group first appeared, a single `"No Data"` entry when nothing groups
//! - Scatter: the filtered subset itself
//!
//! Everything here is a pure function of its input. [`derive`] runs all of them
//! together and is what the session calls after every filter change.
//!
//! ## Means
//!
//! Averages divide by the full filtered count, with a missing score adding 0.
//! An empty subset therefore yields `0.0 / 0.0`, which is NaN and is left as
//! NaN so the caller can render it as "undefined".
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::{filter::Facet, record::Record};

pub const TOP_GROUPS: usize = 10;
pub const PLACEHOLDER: &str = "No Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntensityBucket {
    pub intensity: i64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionSlice {
    pub name: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub mean_intensity: f64,
    pub mean_relevance: f64,
    pub mean_likelihood: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedDatasets {
    pub by_intensity: Vec<IntensityBucket>,
    pub by_region: Vec<RegionSlice>,
    pub by_topic: Vec<TopicCount>,
    pub scatter_points: Vec<Record>,
    pub summary: Summary,
}

pub fn derive(filtered: &[Record]) -> DerivedDatasets {
    DerivedDatasets {
        by_intensity: by_intensity(filtered),
        by_region: by_region(filtered),
        by_topic: by_topic(filtered),
        scatter_points: filtered.to_vec(),
        summary: summary(filtered),
    }
}

pub fn by_intensity(records: &[Record]) -> Vec<IntensityBucket> {
    let mut buckets: BTreeMap<i64, u64> = BTreeMap::new();

    for intensity in records.iter().filter_map(|r| r.intensity) {
        *buckets.entry(intensity.round() as i64).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(intensity, count)| IntensityBucket { intensity, count })
        .collect()
}

/// Top regions by count. Records with no region, or an empty one, are not counted.
pub fn by_region(records: &[Record]) -> Vec<RegionSlice> {
    let groups = top_groups(records, Facet::Region, TOP_GROUPS);

    if groups.is_empty() {
        return vec![RegionSlice {
            name: PLACEHOLDER.to_string(),
            value: 0,
        }];
    }

    groups
        .into_iter()
        .map(|(name, value)| RegionSlice { name, value })
        .collect()
}

/// Top topics by count. Records with no topic, or an empty one, are not counted.
pub fn by_topic(records: &[Record]) -> Vec<TopicCount> {
    let groups = top_groups(records, Facet::Topic, TOP_GROUPS);

    if groups.is_empty() {
        return vec![TopicCount {
            topic: PLACEHOLDER.to_string(),
            count: 0,
        }];
    }

    groups
        .into_iter()
        .map(|(topic, count)| TopicCount { topic, count })
        .collect()
}

/// Counts per facet value, descending, first-seen order on ties. Records with
/// the facet absent or empty are not grouped.
pub fn top_groups(records: &[Record], facet: Facet, limit: usize) -> Vec<(String, u64)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, u64)> = Vec::new();

    for value in records.iter().filter_map(|r| facet.value(r)) {
        if value.is_empty() {
            continue;
        }

        match slots.get(value) {
            Some(&slot) => groups[slot].1 += 1,
            None => {
                slots.insert(value, groups.len());
                groups.push((value, 1));
            }
        }
    }

    // stable, so equal counts stay in insertion order
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups.truncate(limit);

    groups
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

pub fn summary(records: &[Record]) -> Summary {
    let total = records.len();

    Summary {
        total,
        mean_intensity: mean(records, |r| r.intensity),
        mean_relevance: mean(records, |r| r.relevance),
        mean_likelihood: mean(records, |r| r.likelihood),
    }
}

fn mean(records: &[Record], score: impl Fn(&Record) -> Option<f64>) -> f64 {
    let sum: f64 = records.iter().map(|r| score(r).unwrap_or(0.0)).sum();

    sum / records.len() as f64
}

/// Distinct non-empty values per facet over the whole raw dataset, ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    options: BTreeMap<Facet, Vec<String>>,
}

impl FacetOptions {
    pub fn from_records(records: &[Record]) -> Self {
        let options = Facet::ALL
            .into_iter()
            .map(|facet| {
                let values: BTreeSet<&str> = records
                    .iter()
                    .filter_map(|r| facet.value(r))
                    .filter(|v| !v.is_empty())
                    .collect();

                (facet, values.into_iter().map(str::to_string).collect())
            })
            .collect();

        Self { options }
    }

    pub fn get(&self, facet: Facet) -> &[String] {
        self.options.get(&facet).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FacetOptions, IntensityBucket, PLACEHOLDER, RegionSlice, TOP_GROUPS, TopicCount,
        by_intensity, by_region, by_topic, derive, summary, top_groups,
    };
    use crate::{
        filter::{Facet, FilterState, apply},
        record::Record,
    };

    fn regional(region: &str, intensity: f64) -> Record {
        Record {
            region: Some(region.to_string()),
            intensity: Some(intensity),
            ..Default::default()
        }
    }

    fn scenario() -> Vec<Record> {
        vec![
            regional("Africa", 3.0),
            regional("Africa", 3.0),
            regional("Asia", 1.0),
        ]
    }

    fn slice(name: &str, value: u64) -> RegionSlice {
        RegionSlice {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn test_unfiltered_scenario() {
        let derived = derive(&apply(&scenario(), &FilterState::new()));

        assert_eq!(
            derived.by_intensity,
            vec![
                IntensityBucket { intensity: 1, count: 1 },
                IntensityBucket { intensity: 3, count: 2 },
            ]
        );
        assert_eq!(derived.by_region, vec![slice("Africa", 2), slice("Asia", 1)]);
        assert_eq!(derived.scatter_points.len(), 3);
    }

    #[test]
    fn test_region_filter_scenario() {
        let mut filters = FilterState::new();
        filters.set(Facet::Region, "Asia");

        let derived = derive(&apply(&scenario(), &filters));

        assert_eq!(derived.summary.total, 1);
        assert_eq!(derived.by_region, vec![slice("Asia", 1)]);
        assert_eq!(derived.summary.mean_intensity, 1.0);
    }

    #[test]
    fn test_unknown_region_scenario() {
        let mut filters = FilterState::new();
        filters.set(Facet::Region, "Atlantis");

        let derived = derive(&apply(&scenario(), &filters));

        assert_eq!(derived.summary.total, 0);
        assert_eq!(derived.by_region, vec![slice(PLACEHOLDER, 0)]);
        assert_eq!(
            derived.by_topic,
            vec![TopicCount {
                topic: PLACEHOLDER.to_string(),
                count: 0
            }]
        );
        assert!(derived.by_intensity.is_empty());
        assert!(derived.scatter_points.is_empty());
        assert!(derived.summary.mean_intensity.is_nan());
        assert!(derived.summary.mean_relevance.is_nan());
        assert!(derived.summary.mean_likelihood.is_nan());
    }

    #[test]
    fn test_intensity_rounding() {
        let records: Vec<Record> = [0.4, 0.5, 1.49, 2.5, -0.5, 6.0]
            .into_iter()
            .map(|i| regional("Asia", i))
            .collect();

        let buckets: Vec<(i64, u64)> = by_intensity(&records)
            .into_iter()
            .map(|b| (b.intensity, b.count))
            .collect();

        assert_eq!(buckets, vec![(-1, 1), (0, 1), (1, 2), (3, 1), (6, 1)]);
    }

    #[test]
    fn test_intensity_counts_only_present() {
        let mut records = scenario();
        records.push(Record::default());
        records.push(Record {
            intensity: Some(10.0),
            ..Default::default()
        });

        let buckets = by_intensity(&records);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        let present = records.iter().filter(|r| r.intensity.is_some()).count() as u64;

        assert_eq!(total, present);
        assert!(buckets.windows(2).all(|w| w[0].intensity < w[1].intensity));
    }

    #[test]
    fn test_top_groups_truncates_and_sorts() {
        let mut records = Vec::new();
        for i in 0..15 {
            for _ in 0..=(i % 4) {
                records.push(Record {
                    topic: Some(format!("topic-{i}")),
                    ..Default::default()
                });
            }
        }

        let topics = by_topic(&records);

        assert_eq!(topics.len(), TOP_GROUPS);
        assert!(topics.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(topics[0].topic, "topic-3");
        assert_eq!(topics[1].topic, "topic-7");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let records: Vec<Record> = ["Europe", "Asia", "Africa", "Asia", "Europe", "Oceania"]
            .into_iter()
            .map(|r| regional(r, 1.0))
            .collect();

        assert_eq!(
            by_region(&records),
            vec![
                slice("Europe", 2),
                slice("Asia", 2),
                slice("Africa", 1),
                slice("Oceania", 1),
            ]
        );
    }

    #[test]
    fn test_scatter_points_are_filtered_subset() {
        let mut records = scenario();
        records.push(Record {
            region: Some("Asia".to_string()),
            likelihood: Some(2.0),
            relevance: Some(5.0),
            ..Default::default()
        });

        let mut filters = FilterState::new();
        filters.set(Facet::Region, "Asia");
        let filtered = apply(&records, &filters);

        assert_eq!(derive(&filtered).scatter_points, filtered);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_topic_skips_absent_and_empty() {
        let records = vec![
            Record::default(),
            Record {
                topic: Some(String::new()),
                ..Default::default()
            },
            Record {
                topic: Some("oil".to_string()),
                ..Default::default()
            },
        ];

        assert_eq!(
            by_topic(&records),
            vec![TopicCount {
                topic: "oil".to_string(),
                count: 1
            }]
        );
    }

    #[test]
    fn test_absent_and_empty_values_not_grouped() {
        let records = vec![
            Record::default(),
            Record {
                region: Some(String::new()),
                ..Default::default()
            },
        ];

        assert!(top_groups(&records, Facet::Region, TOP_GROUPS).is_empty());
        assert_eq!(by_region(&records), vec![slice(PLACEHOLDER, 0)]);
    }

    #[test]
    fn test_mean_counts_missing_as_zero() {
        let records = vec![
            Record {
                relevance: Some(4.0),
                likelihood: Some(3.0),
                ..Default::default()
            },
            Record::default(),
        ];

        let stats = summary(&records);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.mean_relevance, 2.0);
        assert_eq!(stats.mean_likelihood, 1.5);
        assert_eq!(stats.mean_intensity, 0.0);
    }

    #[test]
    fn test_facet_options() {
        let records = vec![
            Record {
                country: Some("India".to_string()),
                pestle: Some("Economic".to_string()),
                ..Default::default()
            },
            Record {
                country: Some("Brazil".to_string()),
                ..Default::default()
            },
            Record {
                country: Some("India".to_string()),
                pestle: Some(String::new()),
                ..Default::default()
            },
        ];

        let options = FacetOptions::from_records(&records);

        assert_eq!(options.get(Facet::Country), ["Brazil", "India"]);
        assert_eq!(options.get(Facet::Pestle), ["Economic"]);
        assert!(options.get(Facet::Topic).is_empty());
    }
}
