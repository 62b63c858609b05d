// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use gas_scrape::{core::Dom, Extractor};

const CARD: &str = include_str!("../tests/fixtures/card.html");
const FREE_TEXT: &str = include_str!("../tests/fixtures/free_text.html");
const NO_PRICE: &str = include_str!("../tests/fixtures/no_price.html");

/// Pads a fixture with unrelated markup, closer to a real article page.
fn padded(page: &str) -> String {
    let filler = "<div class=\"related\"><h3>More news</h3><p>Lorem ipsum dolor sit amet.</p></div>\n".repeat(400);
    page.replacen("<body>", &format!("<body>\n{filler}"), 1)
}

fn bench_extract(c: &mut Criterion) {
    let ex = Extractor::default();
    let card = padded(CARD);
    let free_text = padded(FREE_TEXT);
    let no_price = padded(NO_PRICE);

    c.bench_function("dom_parse", |b| {
        b.iter(|| black_box(Dom::parse(black_box(&card)).len()))
    });

    // first strategy hits
    c.bench_function("extract_card", |b| {
        b.iter(|| black_box(ex.extract(black_box(&card)).is_ok()))
    });

    // falls through to the last strategy
    c.bench_function("extract_free_text", |b| {
        b.iter(|| black_box(ex.extract(black_box(&free_text)).is_ok()))
    });

    c.bench_function("extract_miss", |b| {
        b.iter(|| black_box(ex.extract(black_box(&no_price)).is_err()))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
