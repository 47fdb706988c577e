use paramflow_core::{
    artifact::SegmentArtifact,
    config::SegmentInterpolation,
    data::{Segment, SegmentTracks},
    segments::sample_segments,
    ParamFlowError, Sampler, SegmentSampler, StaticSampler,
};

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn baked_fixture() -> SegmentArtifact {
    let json = paramflow_test_fixtures::segments::json("camera-move-baked")
        .expect("load camera-move-baked fixture");
    SegmentArtifact::from_json(&json).expect("parse segment artifact")
}

fn defaults() -> [(&'static str, f64); 3] {
    [("zoom", 1.0), ("pan", 0.0), ("exposure", 0.5)]
}

#[test]
fn fixture_loads_with_ghost_and_malformed_handling() {
    let (sampler, report) =
        SegmentSampler::from_artifact(defaults(), baked_fixture(), SegmentInterpolation::Cubic);

    assert_eq!(report.loaded, vec!["pan", "zoom"]);
    assert_eq!(report.ignored, vec!["legacy.tilt"]);
    assert!(report.seeded.is_empty());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].parameter(), Some("exposure"));
    assert!(matches!(report.errors[0], ParamFlowError::MalformedTrackData { .. }));

    assert_eq!(sampler.parameter_names(), vec!["exposure", "pan", "zoom"]);
    assert_eq!(sampler.segments("exposure"), Some(&[][..]));
    let values = sampler.values_at(1.0);
    assert_eq!(values.len(), 3);
    assert_eq!(values["exposure"], 0.5);
}

#[test]
fn cubic_interior_uses_segment_velocities() {
    let (sampler, _) =
        SegmentSampler::from_artifact(defaults(), baked_fixture(), SegmentInterpolation::Cubic);
    // zoom 0..2: control points 1, 5/3, 3, 3
    approx(sampler.values_at(1.0)["zoom"], 2.25, 1e-12);
    approx(sampler.values_at(0.0)["zoom"], 1.0, 1e-12);
    approx(sampler.values_at(2.0)["zoom"], 3.0, 1e-12);
    // pan velocities equal the chord slope, so the cubic is a straight line
    approx(sampler.values_at(1.0)["pan"], 0.5, 1e-12);
    approx(sampler.velocities_at(3.0)["pan"], 0.5, 1e-12);
}

#[test]
fn linear_mode_ignores_velocities() {
    let (sampler, _) =
        SegmentSampler::from_artifact(defaults(), baked_fixture(), SegmentInterpolation::Linear);
    assert_eq!(sampler.mode(), SegmentInterpolation::Linear);
    approx(sampler.values_at(1.0)["zoom"], 2.0, 1e-12);
    approx(sampler.values_at(3.0)["zoom"], 2.0, 1e-12);
}

#[test]
fn extrapolates_linearly_outside_segments() {
    let (sampler, _) =
        SegmentSampler::from_artifact(defaults(), baked_fixture(), SegmentInterpolation::Cubic);
    // pan: startVelocity 0.5 before 0
    approx(sampler.values_at(-2.0)["pan"], -1.0, 1e-12);
    // zoom: endVelocity -1 after 4
    approx(sampler.values_at(5.0)["zoom"], 0.0, 1e-12);
    approx(sampler.velocities_at(5.0)["zoom"], -1.0, 1e-12);
}

#[test]
fn missing_boundary_velocity_holds_the_edge_value() {
    let segs = [Segment::new(1.0, 2.0, 3.0, 4.0)];
    for mode in [SegmentInterpolation::Cubic, SegmentInterpolation::Linear] {
        assert_eq!(sample_segments(&segs, 0.0, mode), Some(3.0));
        assert_eq!(sample_segments(&segs, 9.0, mode), Some(4.0));
    }
}

#[test]
fn gaps_hold_previous_end_value() {
    let segs = [
        Segment::new(0.0, 1.0, 0.0, 1.0),
        Segment::new(2.0, 3.0, 5.0, 6.0),
    ];
    assert_eq!(sample_segments(&segs, 1.5, SegmentInterpolation::Cubic), Some(1.0));
    approx(
        sample_segments(&segs, 2.5, SegmentInterpolation::Cubic).unwrap(),
        5.5,
        1e-12,
    );
}

#[test]
fn malformed_tracks_sample_as_zero_without_defaults() {
    let mut tracks = SegmentTracks::new();
    tracks.insert(
        "overlap".into(),
        vec![Segment::new(0.0, 2.0, 4.0, 4.0), Segment::new(1.0, 3.0, 4.0, 4.0)],
    );
    tracks.insert("empty".into(), vec![]);
    tracks.insert("ok".into(), vec![Segment::new(0.0, 1.0, 7.0, 7.0)]);
    let sampler = SegmentSampler::new(tracks);

    let values = sampler.values_at(0.5);
    assert_eq!(values["overlap"], 0.0);
    assert_eq!(values["empty"], 0.0);
    assert_eq!(values["ok"], 7.0);
    assert_eq!(sampler.velocities_at(0.5)["overlap"], 0.0);
}

#[test]
fn load_seeds_missing_known_parameters() {
    let mut tracks = SegmentTracks::new();
    tracks.insert("pan".into(), vec![Segment::new(0.0, 1.0, 0.0, 1.0)]);
    let (sampler, report) = SegmentSampler::load(defaults(), tracks, SegmentInterpolation::Cubic);
    assert_eq!(report.seeded, vec!["exposure", "zoom"]);
    assert_eq!(sampler.values_at(10.0)["zoom"], 1.0);
    assert_eq!(sampler.velocities_at(10.0)["zoom"], 0.0);
}

#[test]
fn samplers_are_interchangeable() {
    let (segments, _) =
        SegmentSampler::from_artifact(defaults(), baked_fixture(), SegmentInterpolation::Cubic);
    let fixed = StaticSampler::new(defaults());
    let samplers: Vec<Box<dyn Sampler>> = vec![Box::new(segments), Box::new(fixed)];
    for sampler in &samplers {
        let values = sampler.values_at(0.0);
        assert_eq!(values["zoom"], 1.0);
        assert_eq!(sampler.parameter_names(), vec!["exposure", "pan", "zoom"]);
    }
}
