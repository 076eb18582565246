use criterion::{Criterion, criterion_group, criterion_main};

pub fn criterion_benchmark(c: &mut Criterion) {
    use lenient_bibtex::{Parser, ParserConfig, parse};

    let input = std::fs::read_to_string("assets/sample.bib").unwrap();
    let repeated = input.repeat(200);

    c.bench_function("sample parse", |b| b.iter(|| parse(&input)));

    c.bench_function("sample parse repeated", |b| b.iter(|| parse(&repeated)));

    c.bench_function("sample parse no months", |b| {
        b.iter(|| {
            let config = ParserConfig {
                month_macros: false,
                ..ParserConfig::default()
            };
            Parser::with_config(&repeated, config).parse()
        })
    });

    let doc = parse(&repeated).unwrap();
    c.bench_function("sample resolve", |b| {
        b.iter(|| {
            doc.entries
                .iter()
                .flat_map(|entry| entry.tags.values())
                .filter_map(|value| doc.macros.resolve(value.parts()).ok())
                .count()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
