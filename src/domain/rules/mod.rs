// Domain rules - Split point planning

use crate::domain::model::*;

/// Shortest range worth encoding; anything below is float noise
const MIN_RANGE_SECONDS: f64 = 0.01;

/// Raw detector output gathered before planning
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitAnalysis {
    /// Scene-change timestamps in seconds
    pub scene_cuts: Vec<f64>,
    /// Detected silent intervals `(start, end)` in seconds
    pub silences: Vec<(f64, f64)>,
}

/// Boundaries chosen for a video and the strategy that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    pub strategy: SplitStrategy,
    pub ranges: Vec<ClipRange>,
}

/// Choose clip boundaries, falling through scene → silence → equal.
///
/// An explicit `Scene` or `Silence` strategy falls back to equal cuts
/// when its detector found nothing usable.
pub fn plan_boundaries(
    strategy: SplitStrategy,
    analysis: &SplitAnalysis,
    total_duration: f64,
    window: &DurationWindow,
) -> SplitPlan {
    if strategy.uses_scenes() && !analysis.scene_cuts.is_empty() {
        let ranges = merge_scenes_to_duration(&analysis.scene_cuts, window, total_duration);
        if !ranges.is_empty() {
            return SplitPlan {
                strategy: SplitStrategy::Scene,
                ranges,
            };
        }
    }

    if strategy.uses_silence() && !analysis.silences.is_empty() {
        let chunks = speech_chunks_from_silences(&analysis.silences, total_duration);
        let ranges = silence_boundaries(&chunks, window);
        if !ranges.is_empty() {
            return SplitPlan {
                strategy: SplitStrategy::Silence,
                ranges,
            };
        }
    }

    SplitPlan {
        strategy: SplitStrategy::Equal,
        ranges: equal_boundaries(total_duration, window),
    }
}

/// Fixed-length cuts of `max` seconds; a short tail joins the previous clip
pub fn equal_boundaries(total_duration: f64, window: &DurationWindow) -> Vec<ClipRange> {
    let mut bounds: Vec<(f64, f64)> = Vec::new();
    if total_duration <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    while start < total_duration {
        let end = (start + window.max).min(total_duration);
        let is_tail = end >= total_duration;
        if is_tail && end - start < window.min - MIN_RANGE_SECONDS && !bounds.is_empty() {
            if let Some(last) = bounds.last_mut() {
                last.1 = end;
            }
        } else {
            bounds.push((start, end));
        }
        start = end;
    }

    to_ranges(bounds)
}

/// Group scene cuts into clips that fit the window.
///
/// Each clip ends at the latest scene cut that keeps it within the window
/// and leaves at least `min` seconds behind it. Stretches without such a
/// cut are cut at `max`, and the final overlong stretch is halved.
pub fn merge_scenes_to_duration(
    scene_cuts: &[f64],
    window: &DurationWindow,
    total_duration: f64,
) -> Vec<ClipRange> {
    if total_duration <= 0.0 {
        return Vec::new();
    }

    let mut cuts: Vec<f64> = scene_cuts
        .iter()
        .copied()
        .filter(|c| c.is_finite() && *c > 0.0 && *c < total_duration)
        .collect();
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts.dedup_by(|a, b| (*a - *b).abs() < MIN_RANGE_SECONDS);

    let mut bounds = Vec::new();
    let mut start = 0.0;
    while total_duration - start > MIN_RANGE_SECONDS {
        let remaining = total_duration - start;
        if remaining <= window.max {
            bounds.push((start, total_duration));
            break;
        }

        let usable = cuts.iter().rev().copied().find(|&cut| {
            let length = cut - start;
            window.contains(length) && total_duration - cut >= window.min
        });

        let end = match usable {
            Some(cut) => cut,
            None if remaining < window.max + window.min => start + remaining / 2.0,
            None => start + window.max,
        };
        bounds.push((start, end));
        start = end;
    }

    to_ranges(bounds)
}

/// Complement of the silent intervals within `[0, total]`
pub fn speech_chunks_from_silences(silences: &[(f64, f64)], total_duration: f64) -> Vec<(f64, f64)> {
    let mut sorted: Vec<(f64, f64)> = silences
        .iter()
        .map(|&(s, e)| (s.max(0.0), e.min(total_duration)))
        .filter(|(s, e)| e > s)
        .collect();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut chunks = Vec::new();
    let mut cursor = 0.0;
    for (silence_start, silence_end) in sorted {
        if silence_start - cursor > MIN_RANGE_SECONDS {
            chunks.push((cursor, silence_start));
        }
        cursor = f64::max(cursor, silence_end);
    }
    if total_duration - cursor > MIN_RANGE_SECONDS {
        chunks.push((cursor, total_duration));
    }
    chunks
}

/// Clips ending at the close of each speech chunk long enough to stand alone.
///
/// A clip runs from where the previous one ended to the end of the
/// chunk; if that span exceeds `max` it is divided into
/// `ceil(span / max)` equal pieces.
pub fn silence_boundaries(speech_chunks: &[(f64, f64)], window: &DurationWindow) -> Vec<ClipRange> {
    let mut bounds = Vec::new();
    let mut cursor = 0.0;

    for &(chunk_start, chunk_end) in speech_chunks {
        if chunk_end - chunk_start < window.min {
            continue;
        }

        let span = chunk_end - cursor;
        if span <= window.max {
            bounds.push((cursor, chunk_end));
        } else {
            let pieces = (span / window.max).ceil() as usize;
            let step = span / pieces as f64;
            for i in 0..pieces {
                let start = cursor + i as f64 * step;
                let end = if i + 1 == pieces { chunk_end } else { start + step };
                bounds.push((start, end));
            }
        }
        cursor = chunk_end;
    }

    to_ranges(bounds)
}

fn to_ranges(bounds: Vec<(f64, f64)>) -> Vec<ClipRange> {
    bounds
        .into_iter()
        .filter(|(s, e)| e - s > MIN_RANGE_SECONDS)
        .filter_map(|(s, e)| ClipRange::from_seconds(s, e).ok())
        .collect()
}

#[cfg(test)]
mod tests;
