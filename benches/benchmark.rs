//! Performance benchmarks for earnings-corpus.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks cover the text stages on a synthetic filing:
//! - exhibit location over a multi-document container
//! - markup normalization of the exhibit
//! - the noise filter on the normalized text

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use earnings_corpus::exhibit::locate_exhibit;
use earnings_corpus::normalize::extract_text;
use earnings_corpus::{clean_exhibit, FilingLines, NoiseFilter};

const PARAGRAPHS: &[&str] = &[
    "ACME Corporation today reports results for the fourth quarter and full fiscal year.",
    "Revenue rose on strong demand across every region, and margins improved as costs fell.",
    "This press release contains forward-looking statements that involve risks and uncertainties.",
    "A conference call to discuss these results will be held tomorrow morning.",
    "ACME is a leading manufacturer of widgets and gadgets for industrial customers.",
];

fn sample_filing() -> String {
    let mut filing = String::from("<SEC-DOCUMENT>\n<DOCUMENT>\n<TYPE>8-K\n<TEXT>\n");
    for _ in 0..200 {
        filing.push_str("Item 2.02 Results of Operations and Financial Condition.\n");
    }
    filing.push_str("</TEXT>\n</DOCUMENT>\n<DOCUMENT>\n<TYPE>EX-99.1\n<TEXT>\n<html><body>\n");
    for round in 0..40 {
        for paragraph in PARAGRAPHS {
            filing.push_str("<p>");
            filing.push_str(paragraph);
            filing.push_str("</p>\n");
        }
        if round % 4 == 0 {
            filing.push_str("<table><tr><td>Net sales</td><td>1,024</td><td>998</td></tr></table>\n");
        }
    }
    filing.push_str("</body></html>\n</TEXT>\n</DOCUMENT>\n</SEC-DOCUMENT>\n");
    filing
}

fn bench_stages(c: &mut Criterion) {
    let filing = sample_filing();
    let fragment = locate_exhibit(FilingLines::from_bytes(filing.as_bytes()));
    let text = extract_text(&fragment);
    let filter = NoiseFilter::default();

    let mut group = c.benchmark_group("stages");
    group.throughput(Throughput::Bytes(filing.len() as u64));

    group.bench_function("locate_exhibit", |b| {
        b.iter(|| locate_exhibit(FilingLines::from_bytes(black_box(filing.as_bytes()))));
    });
    group.bench_function("extract_text", |b| {
        b.iter(|| extract_text(black_box(&fragment)));
    });
    group.bench_function("noise_filter", |b| {
        b.iter(|| filter.filter(black_box(&text)));
    });
    group.bench_function("clean_exhibit", |b| {
        b.iter(|| clean_exhibit(FilingLines::from_bytes(black_box(filing.as_bytes())), 0.05).ok());
    });

    group.finish();
}

criterion_group!(benches, bench_stages);
criterion_main!(benches);
