use sipreel_core::simulation::error::SimulationError;
use sipreel_engine::sampler::frame_schedule;

#[test]
fn test_even_spacing_rounds_to_nearest() {
    let schedule = frame_schedule(10, 4).unwrap();
    assert_eq!(schedule.cut_points(), &[1, 4, 7, 10]);

    // 1 + 4 * i / 3 = 1, 2.33, 3.67, 5 -> 1, 2, 4, 5
    let schedule = frame_schedule(5, 4).unwrap();
    assert_eq!(schedule.cut_points(), &[1, 2, 4, 5]);

    // 1 + 1 * i / 2 = 1, 1.5, 2 -> .5 向上取整
    let schedule = frame_schedule(2, 3);
    assert_eq!(schedule.unwrap().cut_points(), &[1, 2, 2]);
}

#[test]
fn test_short_series_pads_with_final_frame() {
    let schedule = frame_schedule(3, 5).unwrap();
    assert_eq!(schedule.cut_points(), &[1, 2, 3, 3, 3]);

    let schedule = frame_schedule(1, 4).unwrap();
    assert_eq!(schedule.cut_points(), &[1, 1, 1, 1]);
}

#[test]
fn test_schedule_shape_holds_across_sizes() {
    for n in 1..=120 {
        for num_frames in 1..=60 {
            let schedule = frame_schedule(n, num_frames).unwrap();
            let cuts = schedule.cut_points();

            assert_eq!(cuts.len(), num_frames, "n={n}, frames={num_frames}");
            assert!(cuts[0] >= 1);
            assert_eq!(*cuts.last().unwrap(), n);
            assert!(cuts.iter().all(|&c| c >= 1 && c <= n));
            assert!(cuts.windows(2).all(|w| w[0] <= w[1]));

            if n < num_frames {
                let expected: Vec<usize> = (1..=n).collect();
                assert_eq!(&cuts[..n], expected.as_slice());
                assert!(cuts[n..].iter().all(|&c| c == n));
            } else if num_frames > 1 {
                assert_eq!(cuts[0], 1);
            }
        }
    }
}

#[test]
fn test_single_frame_shows_everything() {
    assert_eq!(frame_schedule(500, 1).unwrap().cut_points(), &[500]);
}

#[test]
fn test_schedule_is_deterministic() {
    let a = frame_schedule(5479, 200).unwrap();
    let b = frame_schedule(5479, 200).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), 200);
}

#[test]
fn test_zero_arguments_are_rejected() {
    assert!(matches!(
        frame_schedule(0, 10),
        Err(SimulationError::InvalidInput(_))
    ));
    assert!(matches!(
        frame_schedule(10, 0),
        Err(SimulationError::InvalidInput(_))
    ));
}
