use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};

static SOURCE: &str = r##"
#[derive(Debug)]
pub fn foobar<'a>(val: &'a str, n: u32) -> Option<&'a str> { // line comment
    let raw = r#"raw "string""#; let bytes = b"bytes\n"; let c = '\u{1F600}';
    /* block /* nested */ comment */ if n >= 0x1F_u32 && 1.5e3f64 > 2.0 { Some(val) } else { None }
}
"##;

static IDENTIFIERS: &str =
    "It was the year when they finally immanentized the Eschaton It was the year when they \
     finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton It was the year when \
     they finally immanentized the Eschaton It was the year when they finally immanentized the \
     Eschaton It was the year when they finally immanentized the Eschaton";

fn iterate(s: &str) {
    for token in arbor_tokenizer::tokenize(s) {
        black_box(token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    let source = SOURCE.repeat(30);
    let candidates = [("identifiers", IDENTIFIERS), ("rust_like_source", source.as_str())];
    for (name, source) in candidates {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, &s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
