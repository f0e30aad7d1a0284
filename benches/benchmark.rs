//! Performance benchmarks for klartext.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use klartext::{filter_fragment, perspective_daily, TagFilter};

const SAMPLE_FRAGMENT: &str = r#"
<h1>Beispielartikel</h1>
<p>Der erste Absatz enthält laufenden Text mit einer
Fußnote<span class="info">Quelle: irgendwo, 2019</span> mittendrin und geht
danach noch ein Stück weiter.</p>
<q class="quote">Ein herausgehobenes Zitat, das den Text wiederholt.</q>
<p>Der zweite Absatz bringt <em>Hervorhebungen</em> und ein
Bild<figure><img src="bild.jpg">Bildunterschrift mit Credit</figure> mit.</p>
<p>Ein dritter Absatz sorgt für genug Text, um die Messung über etwas
mehr als nur ein paar Token laufen zu lassen.</p>
"#;

fn benchmark_filter(c: &mut Criterion) {
    let rules = perspective_daily::filter_rules();

    let mut group = c.benchmark_group("filter");
    group.throughput(Throughput::Bytes(SAMPLE_FRAGMENT.len() as u64));
    group.bench_function("sample_fragment", |b| {
        b.iter(|| filter_fragment(black_box(SAMPLE_FRAGMENT), rules));
    });

    // A tenfold repetition keeps the suppression stack busy across a longer
    // document without fixture files.
    let large = SAMPLE_FRAGMENT.repeat(10);
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large_fragment", |b| {
        b.iter(|| {
            let mut filter = TagFilter::new(rules);
            filter.feed(black_box(&large));
            filter.into_text()
        });
    });
    group.finish();
}

criterion_group!(benches, benchmark_filter);
criterion_main!(benches);
