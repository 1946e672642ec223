//! Corpus statistics and mood-over-time series.
//!
//! Everything here is a pure function of the entries passed in. Averages over
//! empty inputs are `0.0`, never NaN.

use crate::constants::{
    LARGE_SERIES_THRESHOLD, REFERENCE_MARK_MIN_POINTS, SMOOTHING_RADIUS, SMOOTHING_RADIUS_LARGE,
};
use crate::entry::Entry;
use crate::mood::segment::{count_words, split_sentences};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

/// Writing statistics over a set of entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorpusStats {
    pub total_entries: usize,
    pub total_sentences: usize,
    pub total_words: usize,
    pub avg_sentences_per_entry: f64,
    pub avg_words_per_sentence: f64,
    /// Mean gap in whole days between consecutive entries, in date order.
    pub avg_days_between_entries: f64,
}

impl CorpusStats {
    pub fn compute(entries: &[Entry]) -> Self {
        let total_entries = entries.len();
        let mut total_sentences = 0;
        let mut total_words = 0;

        for entry in entries {
            let text = entry.plain_text();
            total_sentences += split_sentences(&text).len();
            total_words += count_words(&text);
        }

        let mut dates: Vec<_> = entries.iter().map(|entry| entry.date).collect();
        dates.sort();
        let gaps: Vec<i64> = dates
            .windows(2)
            .map(|pair| pair[1].signed_duration_since(pair[0]).num_days())
            .collect();
        let gap_sum: i64 = gaps.iter().sum();

        let stats = CorpusStats {
            total_entries,
            total_sentences,
            total_words,
            avg_sentences_per_entry: safe_ratio(total_sentences as f64, total_entries as f64),
            avg_words_per_sentence: safe_ratio(total_words as f64, total_sentences as f64),
            avg_days_between_entries: safe_ratio(gap_sum as f64, gaps.len() as f64),
        };
        debug!("Computed corpus stats: {:?}", stats);
        stats
    }
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_nan() {
        0.0
    } else {
        ratio
    }
}

/// One day on the mood chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodPoint {
    pub date: NaiveDate,
    /// Mean mood of that day's samples.
    pub mood: f64,
    /// Mean mood over the smoothing window centred on this point.
    pub average: f64,
}

/// Mood over time, one point per date, ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoodSeries {
    pub points: Vec<MoodPoint>,
    pub overall_average: f64,
}

impl MoodSeries {
    /// Builds a series from `(date, mood)` samples, averaging samples that share a date.
    pub fn from_samples(samples: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for (date, mood) in samples {
            let slot = by_date.entry(date).or_insert((0.0, 0));
            slot.0 += mood;
            slot.1 += 1;
        }

        let daily: Vec<(NaiveDate, f64)> = by_date
            .into_iter()
            .map(|(date, (sum, count))| (date, sum / count as f64))
            .collect();

        let radius = if daily.len() >= LARGE_SERIES_THRESHOLD {
            SMOOTHING_RADIUS_LARGE
        } else {
            SMOOTHING_RADIUS
        };

        let points = (0..daily.len())
            .map(|index| {
                let low = index.saturating_sub(radius);
                let high = (index + radius).min(daily.len() - 1);
                let window = &daily[low..=high];
                let average =
                    window.iter().map(|(_, mood)| mood).sum::<f64>() / window.len() as f64;
                MoodPoint {
                    date: daily[index].0,
                    mood: daily[index].1,
                    average,
                }
            })
            .collect::<Vec<_>>();

        let overall_average = safe_ratio(
            daily.iter().map(|(_, mood)| mood).sum::<f64>(),
            daily.len() as f64,
        );

        MoodSeries {
            points,
            overall_average,
        }
    }

    /// Builds a series from every entry that has a mood, bucketed by UTC date.
    pub fn from_entries(entries: &[Entry]) -> Self {
        Self::from_samples(
            entries
                .iter()
                .filter_map(|entry| entry.mood().map(|mood| (entry.date.date_naive(), mood))),
        )
    }

    /// Whether the chart has enough points to draw the average reference mark.
    pub fn shows_reference_mark(&self) -> bool {
        self.points.len() >= REFERENCE_MARK_MIN_POINTS
    }
}
