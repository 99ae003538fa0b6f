use super::*;

fn timeline() -> Timeline {
    Timeline::from_durations([3.0, 2.0, 1.5]).unwrap()
}

#[test]
fn total_and_starts_are_prefix_sums() {
    let tl = timeline();
    assert_eq!(tl.len(), 3);
    assert_eq!(tl.total_duration(), 6.5);
    assert_eq!(tl.shot_start(0), Some(0.0));
    assert_eq!(tl.shot_start(1), Some(3.0));
    assert_eq!(tl.shot_start(2), Some(5.0));
    assert_eq!(tl.shot_start(3), None);
    assert_eq!(tl.shot_duration(2), Some(1.5));
}

#[test]
fn windows_are_half_open() {
    let tl = timeline();
    assert_eq!(
        tl.resolve(2.999),
        TimelinePosition {
            shot_index: 0,
            local_time: 2.999,
            complete: false
        }
    );
    let at_boundary = tl.resolve(3.0);
    assert_eq!(at_boundary.shot_index, 1);
    assert_eq!(at_boundary.local_time, 0.0);
    assert_eq!(tl.resolve(5.25).shot_index, 2);
    assert_eq!(tl.resolve(5.25).local_time, 0.25);
}

#[test]
fn past_the_end_is_terminal() {
    let tl = timeline();
    for t in [6.5, 7.0, 1e9] {
        let pos = tl.resolve(t);
        assert_eq!(pos.shot_index, 2);
        assert_eq!(pos.local_time, 1.5);
        assert!(pos.complete);
    }
}

#[test]
fn negative_clamps_to_start() {
    let tl = timeline();
    for t in [-1.0, -0.0, f64::NAN, f64::NEG_INFINITY] {
        let pos = tl.resolve(t);
        assert_eq!(pos.shot_index, 0);
        assert_eq!(pos.local_time, 0.0);
        assert!(!pos.complete);
    }
}

#[test]
fn resolve_is_pure_under_seeking() {
    let tl = timeline();
    let times = [4.2, 0.1, 6.0, 3.0, 4.2, 1.0, 6.4, 4.2];
    let first = tl.resolve(4.2);
    for t in times {
        let _ = tl.resolve(t);
        assert_eq!(tl.resolve(4.2), first);
    }
}

#[test]
fn frame_count_rounds() {
    let tl = timeline();
    assert_eq!(tl.frame_count(Fps::from_meta(30).unwrap()), 195);
    let odd = Timeline::from_durations([0.51]).unwrap();
    assert_eq!(odd.frame_count(Fps::from_meta(24).unwrap()), 12);
}

#[test]
fn rejects_empty_and_non_positive_durations() {
    assert!(Timeline::from_durations(Vec::<f64>::new()).is_err());
    assert!(Timeline::from_durations([1.0, 0.0]).is_err());
    assert!(Timeline::from_durations([-1.0]).is_err());
    assert!(Timeline::from_durations([f64::INFINITY]).is_err());
}
