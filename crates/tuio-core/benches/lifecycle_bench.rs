//! Criterion benchmarks for the touch lifecycle engine.
//!
//! Each iteration replays a short gesture: touches go down, move for a number
//! of frames and lift again, so start, move and end paths are all exercised.
//!
//! Run with:
//! ```bash
//! cargo bench --package tuio-core --bench lifecycle_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tuio_core::domain::region::Region;
use tuio_core::engine::{LifecycleEngine, RecordingSink, TouchPipeline};
use tuio_core::protocol::frame::Frame;
use tuio_core::protocol::messages::{CursorMessage, CursorSet};

const MOVE_FRAMES: i64 = 30;

/// Frames for `fingers` touches: down, `MOVE_FRAMES` moves, up.
fn gesture(fingers: i32) -> Vec<Frame> {
    let ids: Vec<i32> = (0..fingers).collect();
    let mut frames = Vec::new();
    for step in 0..=MOVE_FRAMES {
        let mut messages = vec![
            CursorMessage::Source("bench".to_string()),
            CursorMessage::Alive(ids.clone()),
        ];
        for id in &ids {
            messages.push(CursorMessage::Set(CursorSet {
                session_id: *id,
                x: 0.1 + 0.02 * *id as f32,
                y: 0.1 + 0.02 * step as f32,
                vx: 0.0,
                vy: 0.02,
                accel: None,
            }));
        }
        messages.push(CursorMessage::Fseq(step + 1));
        frames.push(Frame::new(messages));
    }
    frames.push(Frame::new(vec![
        CursorMessage::Source("bench".to_string()),
        CursorMessage::Alive(Vec::new()),
        CursorMessage::Fseq(MOVE_FRAMES + 2),
    ]));
    frames
}

fn bench_process_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("lifecycle_gesture");
    for fingers in [1, 5, 10] {
        let frames = gesture(fingers);
        group.bench_with_input(BenchmarkId::new("fingers", fingers), &frames, |b, frames| {
            b.iter(|| {
                let mut engine = LifecycleEngine::new();
                for frame in frames {
                    black_box(engine.process_frame(black_box(frame)));
                }
            })
        });
    }
    group.finish();
}

fn bench_pipeline_with_region(c: &mut Criterion) {
    let frames = gesture(5);
    let region = Region::new(0.0, 0.0, 0.5, 1.0).expect("valid region");
    c.bench_function("pipeline_region_5_fingers", |b| {
        b.iter(|| {
            let mut pipeline = TouchPipeline::with_region(region);
            let mut sink = RecordingSink::new();
            for frame in &frames {
                pipeline.submit_frame(black_box(frame), &mut sink);
            }
            sink.calls.len()
        })
    });
}

criterion_group!(benches, bench_process_frame, bench_pipeline_with_region);
criterion_main!(benches);
