use std::path::PathBuf;

use dashtrail::{
    BackgroundImage, FrameIndex, InMemorySink, PathModel, PngSequenceSink, Point, SessionState,
    StrokeStyle, TraceConfig, TraceError, TraceSession, Vec2, advance, decode_background,
    points_from_path_data,
};

fn opaque_background(w: u32, h: u32, rgb: [u8; 3]) -> BackgroundImage {
    let mut rgba8_premul = Vec::with_capacity((w * h * 4) as usize);
    for _ in 0..w * h {
        rgba8_premul.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    BackgroundImage {
        width: w,
        height: h,
        rgba8_premul,
    }
}

fn config(width: u32, height: u32, speed: f64, dash_len: f64) -> TraceConfig {
    TraceConfig {
        width,
        height,
        speed,
        dash_len,
        stroke: StrokeStyle {
            color: [255, 0, 0, 255],
            width: 4.0,
        },
        ..TraceConfig::default()
    }
}

#[test]
fn two_point_path_produces_two_frames() {
    let path = PathModel::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    let mut session = TraceSession::new(config(20, 20, 5.0, 100.0), path, None).unwrap();
    let mut sink = InMemorySink::new();

    assert_eq!(session.step(&mut sink).unwrap(), SessionState::Running);
    assert!((session.stats().drawn_length - 5.0).abs() < 1e-9);
    assert_eq!(session.step(&mut sink).unwrap(), SessionState::Running);
    assert!((session.stats().drawn_length - 10.0).abs() < 1e-9);
    assert!(session.walker().is_done(session.path()));
    assert_eq!(session.step(&mut sink).unwrap(), SessionState::Done);

    let idx: Vec<FrameIndex> = sink.frames().iter().map(|(i, _)| *i).collect();
    assert_eq!(idx, vec![FrameIndex(1), FrameIndex(2)]);
}

#[test]
fn trace_is_visible_in_the_frame_that_drew_it() {
    // Background is large so the camera has room to move; the pen runs along y = 100.
    let bg = opaque_background(400, 200, [0, 0, 255]);
    let points = points_from_path_data("M 10,100 L 390,100", Vec2::ZERO).unwrap();
    let mut session = TraceSession::new(
        config(64, 64, 20.0, 1000.0),
        PathModel::new(points),
        Some(bg),
    )
    .unwrap();
    let mut sink = InMemorySink::new();
    let stats = session.run(&mut sink).unwrap();
    assert!(stats.frames > 1);
    assert_eq!(stats.frames, sink.frames().len() as u64);

    // First frame: camera snapped onto the focus (30, 100), clamped to x = 32.
    let (_, first) = &sink.frames()[0];
    assert_eq!((first.width, first.height), (64, 64));
    let row = 32usize;
    let px = |x: usize| {
        let i = (row * 64 + x) * 4;
        [
            first.data[i],
            first.data[i + 1],
            first.data[i + 2],
            first.data[i + 3],
        ]
    };
    // Painted stroke (red) over the blue background near the pen; untouched blue ahead of it.
    assert_eq!(px(15), [255, 0, 0, 255]);
    assert_eq!(px(50), [0, 0, 255, 255]);
}

#[test]
fn camera_stays_inside_canvas_for_whole_run() {
    let bg = opaque_background(300, 300, [10, 10, 10]);
    let points =
        points_from_path_data("M 0,0 L 300,0 L 300,300 L 0,300 L 150,150", Vec2::ZERO).unwrap();
    let mut session =
        TraceSession::new(config(100, 80, 9.0, 6.0), PathModel::new(points), Some(bg)).unwrap();
    let mut sink = InMemorySink::new();
    loop {
        let state = session.step(&mut sink).unwrap();
        if state == SessionState::Done {
            break;
        }
        let c = session.camera().clamped_center();
        assert!(c.x >= 50.0 && c.x <= 250.0);
        assert!(c.y >= 40.0 && c.y <= 260.0);
    }
    for (_, f) in sink.frames() {
        assert_eq!((f.width, f.height), (100, 80));
        // Fully inside an opaque background.
        assert!(f.data.chunks_exact(4).all(|p| p[3] == 255));
    }
}

#[test]
fn pure_walk_and_session_agree_on_drawn_length() {
    let points = points_from_path_data("M 0,0 l 30,0 0,40 -30,0 0,-40", Vec2::ZERO).unwrap();
    let path = PathModel::new(points);

    let mut state = dashtrail::DashState::start(&path);
    let mut drawn = 0.0;
    while state.drawn_len < path.length() - 1.0 {
        let (next, tick) = advance(&path, 7.0, state, 3.0);
        drawn += tick.drawn_length();
        state = next;
    }

    let mut session = TraceSession::new(config(32, 32, 3.0, 7.0), path, None).unwrap();
    let stats = session.run(&mut InMemorySink::new()).unwrap();
    assert!((stats.drawn_length - drawn).abs() < 1e-9);
}

#[test]
fn png_sequence_is_written_in_order() {
    let dir = PathBuf::from("target").join("trace_png_sequence");
    let _ = std::fs::remove_dir_all(&dir);

    let bg = opaque_background(50, 50, [200, 200, 200]);
    let path = PathModel::new(vec![Point::new(5.0, 25.0), Point::new(45.0, 25.0)]);
    let mut session = TraceSession::new(config(20, 20, 10.0, 5.0), path, Some(bg)).unwrap();
    let mut sink = PngSequenceSink::new(&dir);
    let stats = session.run(&mut sink).unwrap();

    assert_eq!(stats.frames, 4);
    for i in 1..=4u64 {
        let file = dir.join(format!("{i:06}.png"));
        assert!(file.exists(), "missing {}", file.display());
        let img = decode_background(&std::fs::read(&file).unwrap()).unwrap();
        assert_eq!((img.width, img.height), (20, 20));
    }
    assert!(!dir.join("000005.png").exists());
}

#[test]
fn invalid_configuration_is_reported_before_rendering() {
    let path = PathModel::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    let err = TraceSession::new(config(20, 20, 5.0, 0.0), path, None)
        .err()
        .unwrap();
    assert!(matches!(err, TraceError::ConfigurationInvalid(_)));
}
