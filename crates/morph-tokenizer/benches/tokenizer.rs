use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};

fn benchmark_tokenizer(c: &mut Criterion) {
    let inputs = [
        ("Simple", "export class Test extends Base implements Iface {}\n"),
        (
            "Members",
            r#"
/** Docs */
export class Point<T> {
    // comment
    private x: number = 0;
    static origin = new Point();

    constructor(public readonly y: string, z?: T) {
        this.x = 1;
    }

    get length(): number {
        return Math.sqrt(this.x * this.x);
    }
}
"#,
        ),
    ];

    let mut group = c.benchmark_group("Tokenizer Benchmark");

    for (name, text) in inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("tokenize", name), text, |b, text| {
            b.iter(|| black_box(morph_tokenizer::tokenize(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_tokenizer);
criterion_main!(benches);
