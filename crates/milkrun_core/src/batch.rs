use crate::stop::Stop;

/// Split a globally-ordered stop sequence into provider-call-sized
/// windows of at most `max_intermediates + 2` stops (the fixed origin
/// and destination plus up to `max_intermediates` waypoints between
/// them).
///
/// Consecutive windows share exactly one boundary stop: the last stop of
/// window `i` is the first stop of window `i + 1`, so the legs of the
/// realized route connect. Sequences of fewer than 2 stops are rejected
/// upstream and never reach this function.
pub fn split_into_segments(stops: &[Stop], max_intermediates: usize) -> Vec<&[Stop]> {
    let window = max_intermediates + 2;

    if stops.len() <= window {
        return vec![stops];
    }

    let mut segments = Vec::new();
    let mut start = 0;

    while start < stops.len() - 1 {
        let end = usize::min(start + window, stops.len());
        segments.push(&stops[start..end]);
        start = end - 1;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(count: usize) -> Vec<Stop> {
        (0..count)
            .map(|index| {
                Stop::new(
                    format!("stop-{index}"),
                    format!("Stop {index}"),
                    index as f64 * 0.01,
                    0.0,
                )
            })
            .collect()
    }

    #[test]
    fn test_small_sequence_is_a_single_segment() {
        let stops = stops(27);

        let segments = split_into_segments(&stops, 25);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0], &stops[..]);
    }

    #[test]
    fn test_sixty_stops_at_limit_twenty_five() {
        let stops = stops(60);

        let segments = split_into_segments(&stops, 25);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 27);
        assert_eq!(segments[1].len(), 27);
        assert_eq!(segments[2].len(), 8);
        assert!(segments.iter().all(|segment| segment.len() <= 27));
    }

    #[test]
    fn test_consecutive_segments_share_one_boundary_stop() {
        let stops = stops(60);

        let segments = split_into_segments(&stops, 25);

        for pair in segments.windows(2) {
            assert_eq!(pair[0].last(), pair[1].first());
        }
    }

    #[test]
    fn test_deduplicated_concatenation_reproduces_input() {
        let stops = stops(80);

        let segments = split_into_segments(&stops, 25);

        let mut rebuilt: Vec<Stop> = Vec::new();
        for (index, segment) in segments.iter().enumerate() {
            let skip = if index == 0 { 0 } else { 1 };
            rebuilt.extend(segment.iter().skip(skip).cloned());
        }

        assert_eq!(rebuilt, stops);
    }

    #[test]
    fn test_every_segment_has_at_least_two_stops() {
        // one past the single-window threshold leaves a minimal tail
        let stops = stops(28);

        let segments = split_into_segments(&stops, 25);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].len(), 2);
        assert!(segments.iter().all(|segment| segment.len() >= 2));
    }

    #[test]
    fn test_two_stops_stay_whole() {
        let stops = stops(2);

        let segments = split_into_segments(&stops, 25);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 2);
    }
}
