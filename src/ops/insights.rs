//! Mood analysis and statistics.

use crate::analytics::{CorpusStats, MoodSeries};
use crate::constants::{DATE_FORMAT_ISO, MOOD_SCALE_MAX};
use crate::entry::Entry;
use crate::errors::{AppResult, ClassifierError};
use crate::mood::{analyze_entry, mood_to_scale, MoodReport, MoodScorer};
use crate::store::ObjectStore;
use std::fmt::Write as _;
use tracing::{info, warn};

/// Scores each entry, stores the new mood, and returns the reports.
///
/// An entry whose scoring fails is logged and skipped.
///
/// # Errors
///
/// Returns `ClassifierError::Unavailable` up front when a model is missing,
/// so the caller can report that analytics are off. Store failures propagate.
pub fn analyze_entries(
    store: &dyn ObjectStore<Entry>,
    scorer: &MoodScorer,
    entries: Vec<Entry>,
) -> AppResult<Vec<(Entry, MoodReport)>> {
    if !scorer.is_available() {
        // Let the scorer name the missing model.
        scorer.score("")?;
    }

    let mut analyzed = Vec::with_capacity(entries.len());
    for mut entry in entries {
        match analyze_entry(&mut entry, scorer) {
            Ok(report) => {
                store.insert(&entry)?;
                analyzed.push((entry, report));
            }
            Err(e @ ClassifierError::Unavailable { .. }) => return Err(e.into()),
            Err(e) => warn!("Skipping entry {}: {}", entry.id, e),
        }
    }

    info!("Analyzed {} entries", analyzed.len());
    Ok(analyzed)
}

pub fn render_analysis(entry: &Entry, report: &MoodReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  {}: mood {:+.2} ({}/{})",
        entry.date.format(DATE_FORMAT_ISO),
        entry.heading,
        report.score,
        mood_to_scale(report.score),
        MOOD_SCALE_MAX
    );
    for sentence in &report.sentences {
        let _ = writeln!(
            out,
            "  sentence {}: {:?}",
            sentence.sentence_number, sentence.mood
        );
    }
    out
}

fn bar(mood: f64) -> String {
    "█".repeat(mood_to_scale(mood).max(0) as usize)
}

/// Text report of writing statistics and the mood chart.
pub fn render_stats(stats: &CorpusStats, series: &MoodSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Entries:                 {}", stats.total_entries);
    let _ = writeln!(out, "Sentences:               {}", stats.total_sentences);
    let _ = writeln!(out, "Words:                   {}", stats.total_words);
    let _ = writeln!(
        out,
        "Sentences per entry:     {:.1}",
        stats.avg_sentences_per_entry
    );
    let _ = writeln!(
        out,
        "Words per sentence:      {:.1}",
        stats.avg_words_per_sentence
    );
    let _ = writeln!(
        out,
        "Days between entries:    {:.1}",
        stats.avg_days_between_entries
    );

    if series.points.is_empty() {
        let _ = writeln!(out, "\nNo analyzed entries yet. Run `quill analyze --all`.");
        return out;
    }

    let _ = writeln!(out, "\nMood over time:");
    for point in &series.points {
        let _ = writeln!(
            out,
            "  {}  {:<10}  {:+.2}  (trend {:+.2})",
            point.date, bar(point.mood), point.mood, point.average
        );
    }
    if series.shows_reference_mark() {
        let _ = writeln!(
            out,
            "  average     {:<10}  {:+.2}",
            bar(series.overall_average),
            series.overall_average
        );
    }
    out
}
