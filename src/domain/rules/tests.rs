// Unit tests for split point planning

use super::*;

fn spans(ranges: &[ClipRange]) -> Vec<(f64, f64)> {
    ranges
        .iter()
        .map(|r| (round2(r.start.seconds), round2(r.end.seconds)))
        .collect()
}

fn assert_contiguous(ranges: &[ClipRange], total: f64) {
    assert_eq!(ranges.first().unwrap().start.seconds, 0.0);
    assert!((ranges.last().unwrap().end.seconds - total).abs() < 1e-9);
    for pair in ranges.windows(2) {
        assert!((pair[0].end.seconds - pair[1].start.seconds).abs() < 1e-9);
    }
}

#[test]
fn test_equal_boundaries_exact_fit() {
    let window = DurationWindow::default();
    let ranges = equal_boundaries(150.0, &window);
    assert_eq!(spans(&ranges), vec![(0.0, 60.0), (60.0, 120.0), (120.0, 150.0)]);
}

#[test]
fn test_equal_boundaries_merges_short_tail() {
    let window = DurationWindow::default();
    let ranges = equal_boundaries(130.0, &window);
    assert_eq!(spans(&ranges), vec![(0.0, 60.0), (60.0, 130.0)]);
    assert_contiguous(&ranges, 130.0);
}

#[test]
fn test_equal_boundaries_short_video_is_single_clip() {
    let window = DurationWindow::default();
    assert_eq!(spans(&equal_boundaries(20.0, &window)), vec![(0.0, 20.0)]);
    assert!(equal_boundaries(0.0, &window).is_empty());
}

#[test]
fn test_merge_scenes_prefers_latest_cut_in_window() {
    let window = DurationWindow::default();
    let ranges = merge_scenes_to_duration(&[25.0, 50.0, 95.0, 140.0], &window, 180.0);
    assert_eq!(
        spans(&ranges),
        vec![(0.0, 50.0), (50.0, 95.0), (95.0, 140.0), (140.0, 180.0)]
    );
}

#[test]
fn test_merge_scenes_without_usable_cuts_stays_in_window() {
    let window = DurationWindow::default();
    let ranges = merge_scenes_to_duration(&[5.0], &window, 200.0);
    assert_contiguous(&ranges, 200.0);
    for range in &ranges {
        assert!(window.contains(range.duration().seconds), "{:?}", range);
    }
}

#[test]
fn test_merge_scenes_ignores_unsorted_and_out_of_range_cuts() {
    let window = DurationWindow::default();
    let ranges = merge_scenes_to_duration(&[140.0, -3.0, 50.0, 500.0, 95.0, 50.0], &window, 180.0);
    assert_eq!(ranges.len(), 4);
    assert_contiguous(&ranges, 180.0);
}

#[test]
fn test_speech_chunks_from_silences() {
    let chunks = speech_chunks_from_silences(&[(45.0, 46.0), (40.0, 42.0)], 180.0);
    assert_eq!(chunks, vec![(0.0, 40.0), (42.0, 45.0), (46.0, 180.0)]);
}

#[test]
fn test_silence_boundaries_split_long_chunks_evenly() {
    let window = DurationWindow::default();
    let chunks = vec![(0.0, 40.0), (42.0, 45.0), (46.0, 180.0)];
    let ranges = silence_boundaries(&chunks, &window);

    assert_eq!(ranges.len(), 4);
    assert_eq!(spans(&ranges)[0], (0.0, 40.0));
    assert_contiguous(&ranges, 180.0);
    for range in &ranges[1..] {
        assert!((range.duration().seconds - 140.0 / 3.0).abs() < 1e-6);
    }
}

#[test]
fn test_silence_boundaries_skip_short_chunks() {
    let window = DurationWindow::default();
    assert!(silence_boundaries(&[(0.0, 10.0), (12.0, 20.0)], &window).is_empty());
}

#[test]
fn test_plan_auto_prefers_scenes() {
    let analysis = SplitAnalysis {
        scene_cuts: vec![50.0, 95.0, 140.0],
        silences: vec![(40.0, 42.0)],
    };
    let plan = plan_boundaries(SplitStrategy::Auto, &analysis, 180.0, &DurationWindow::default());
    assert_eq!(plan.strategy, SplitStrategy::Scene);
}

#[test]
fn test_plan_auto_falls_back_to_silence_then_equal() {
    let window = DurationWindow::default();
    let silence_only = SplitAnalysis {
        scene_cuts: vec![],
        silences: vec![(40.0, 42.0), (45.0, 46.0)],
    };
    let plan = plan_boundaries(SplitStrategy::Auto, &silence_only, 180.0, &window);
    assert_eq!(plan.strategy, SplitStrategy::Silence);

    let plan = plan_boundaries(SplitStrategy::Auto, &SplitAnalysis::default(), 180.0, &window);
    assert_eq!(plan.strategy, SplitStrategy::Equal);
    assert_eq!(plan.ranges.len(), 3);
}

#[test]
fn test_plan_explicit_scene_skips_silence() {
    let analysis = SplitAnalysis {
        scene_cuts: vec![],
        silences: vec![(40.0, 42.0)],
    };
    let plan = plan_boundaries(SplitStrategy::Scene, &analysis, 120.0, &DurationWindow::default());
    assert_eq!(plan.strategy, SplitStrategy::Equal);
}

#[test]
fn test_equal_boundaries_fractional_window_only_merges_tail() {
    let window = DurationWindow::new(12.3, 12.3).unwrap();
    let ranges = equal_boundaries(600.0, &window);
    assert_contiguous(&ranges, 600.0);

    let (last, full) = ranges.split_last().unwrap();
    for range in full {
        assert!(
            range.duration().seconds <= window.max + 1e-9,
            "{:?} exceeds max",
            range
        );
    }
    // 48 full clips cover 590.4 s; the 9.6 s tail joins the last one
    assert_eq!(full.len(), 47);
    assert!(last.duration().seconds < window.max + window.min);
}
