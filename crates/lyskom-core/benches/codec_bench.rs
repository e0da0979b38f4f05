//! Criterion benchmarks for the Protocol A codec.
//!
//! Measures frame decoding through [`ByteCursor`] for the shapes that
//! dominate a reading session (long Hollerith text bodies, text-stat with
//! misc-info) and request encoding.
//!
//! Run with:
//! ```bash
//! cargo bench --package lyskom-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lyskom_core::protocol::codec::decode_from_slice;
use lyskom_core::protocol::{CommentKind, CookedMiscInfo, RecipientKind, TextStat};
use lyskom_core::{ByteCursor, CallNo, ConfNo, Hollerith, Request, ResponseShape, TextNo};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn hollerith_frame(len: usize) -> Vec<u8> {
    let body: Vec<u8> = (0..len).map(|i| b"abcdefgh \n"[i % 10]).collect();
    let mut frame = format!("{len}H").into_bytes();
    frame.extend_from_slice(&body);
    frame.push(b'\n');
    frame
}

fn text_stat_frame() -> Vec<u8> {
    b"15 14 13 29 1 100 2 59 0 6 2 12 0 \
      9 { 0 6 6 3 1 14506 6 77 2 100 8 99 9 15 14 13 29 1 100 2 59 0 3 4711 15 7 } \
      1 { 1 1 6 15 14 13 29 1 100 2 59 0 00000000 0 10Htext/plain }\n"
        .to_vec()
}

fn create_text_request() -> Request {
    Request::CreateText {
        text: Hollerith::from("Subject line\nA body that is a little longer than the subject."),
        misc_info: CookedMiscInfo::new()
            .with_recipient(RecipientKind::To, ConfNo(6))
            .with_recipient(RecipientKind::Cc, ConfNo(14506))
            .with_comment_to(CommentKind::Comment, TextNo(4711)),
        aux_items: Vec::new(),
    }
}

// ── Benchmark groups ──────────────────────────────────────────────────────────

/// Benchmarks Hollerith decoding for growing text bodies.
fn bench_hollerith(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_hollerith");
    for len in [16usize, 1024, 65_536] {
        let frame = hollerith_frame(len);
        group.throughput(Throughput::Bytes(frame.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &frame, |b, frame| {
            b.iter(|| decode_from_slice::<Hollerith>(black_box(frame)).unwrap());
        });
    }
    group.finish();
}

/// Benchmarks text-stat decoding including misc-info regrouping.
fn bench_text_stat(c: &mut Criterion) {
    let frame = text_stat_frame();
    c.bench_function("decode_text_stat", |b| {
        b.iter(|| decode_from_slice::<TextStat>(black_box(&frame)).unwrap());
    });
    c.bench_function("decode_text_stat_reply", |b| {
        b.iter(|| {
            let mut cursor = ByteCursor::new(black_box(&frame[..]));
            ResponseShape::for_call(CallNo::GetTextStat)
                .decode(&mut cursor)
                .unwrap()
        });
    });
}

/// Benchmarks request encoding.
fn bench_encode(c: &mut Criterion) {
    let requests: &[(&str, Request)] = &[
        ("get_time", Request::GetTime),
        ("get_text", Request::get_text(TextNo(4711))),
        ("create_text", create_text_request()),
    ];
    let mut group = c.benchmark_group("encode_request");
    for (name, request) in requests {
        group.bench_with_input(BenchmarkId::from_parameter(name), request, |b, request| {
            b.iter(|| black_box(request).encode());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hollerith, bench_text_stat, bench_encode);
criterion_main!(benches);
