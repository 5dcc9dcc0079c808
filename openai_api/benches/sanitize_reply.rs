use criterion::{black_box, criterion_group, criterion_main, Criterion};
use openai_api::sanitize_reply;

// $ cargo bench -p openai_api

fn bench_sanitize(c: &mut Criterion) {
    let with_citations = "Theo tài liệu【4:0†source】, giờ mở cửa là 8h [1†faq.pdf]. ".repeat(20);
    let plain = "Xin chào, tôi có thể giúp gì cho bạn hôm nay? ".repeat(20);

    c.bench_function("sanitize reply with citations", |b| {
        b.iter(|| sanitize_reply(black_box(&with_citations)))
    });

    c.bench_function("sanitize reply without citations", |b| {
        b.iter(|| sanitize_reply(black_box(&plain)))
    });
}

criterion_group!(benches, bench_sanitize);
criterion_main!(benches);
