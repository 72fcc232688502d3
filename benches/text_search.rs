use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rdf_text_search::{DumpQueryExecutor, TextIndexConfig};

const WORDS: [&str; 8] = ["north", "river", "harbour", "castle", "market", "valley", "bridge", "forest"];

/// Generate a Turtle document with `number_entities` labelled resources
fn generate_turtle(number_entities: usize) -> String {
    let mut data = String::from(
        "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n@prefix ex: <http://example.org/> .\n",
    );
    for i in 0..number_entities {
        let first = WORDS[i % WORDS.len()];
        let second = WORDS[(i / WORDS.len()) % WORDS.len()];
        data.push_str(&format!(
            "ex:place{} rdfs:label \"{} {} {}\" ; ex:rank {} .\n",
            i, first, second, i, i
        ));
    }
    data
}

fn loaded_executor(data: &str) -> DumpQueryExecutor {
    let executor = DumpQueryExecutor::new(TextIndexConfig::default()).unwrap();
    executor.initialize(data.as_bytes()).unwrap();
    executor
}

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("initialize");
    group.sample_size(10);
    for size in [1_000usize, 10_000] {
        let data = generate_turtle(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(loaded_executor(data)));
        });
    }
    group.finish();
}

fn bench_text_query(c: &mut Criterion) {
    let executor = loaded_executor(&generate_turtle(10_000));
    let query = r#"
        PREFIX text: <http://jena.apache.org/text#>
        PREFIX ex: <http://example.org/>
        SELECT ?s ?rank WHERE { ?s text:query ( "harbour castle" 50 ) ; ex:rank ?rank }
    "#;

    c.bench_function("text_query_join", |b| {
        b.iter(|| black_box(executor.sparql(query).unwrap().len()));
    });
}

criterion_group!(benches, bench_initialize, bench_text_query);
criterion_main!(benches);
