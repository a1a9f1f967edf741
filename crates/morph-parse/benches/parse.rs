use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use morph_inputs::File;
use morph_parse::FileParse as _;
use salsa::Setter as _;

fn benchmark_parser(c: &mut Criterion) {
    let inputs = [
        (
            "Simple",
            r#"
export class Simple {
    value = 42;
}
"#,
        ),
        (
            "Declarations",
            r#"
import { Base, type Options } from "./base";

/** A point. */
export class Point<T extends object = {}> extends Base implements Iterable<T> {
    private static count: number = 0;
    readonly x: number;

    constructor(public y: string, z?: T) {
        super();
        this.x = 1;
    }

    get length(): number {
        return Math.sqrt(this.x * this.x);
    }

    move(by: number): Point<T> {
        return this;
    }
}

export interface Shape {
    area(): number;
    readonly name?: string;
}

export enum Color { Red, Green = 2, Blue }
export type Id = string | number | [string, number];
"#,
        ),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for (name, text) in inputs {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_text", name), text, |b, text| {
            b.iter(|| black_box(morph_parse::parse_text(text)));
        });
    }

    group.bench_function("reparse after edit", |b| {
        let mut db = salsa::DatabaseImpl::new();
        let file = File::new(&db, "bench.ts".into(), inputs[1].1.to_owned());
        let mut counter = 0u32;

        b.iter(|| {
            counter += 1;
            file.set_text(&mut db).to(format!("{}\nconst n{counter} = {counter};", inputs[1].1));
            black_box(file.parse(&db).tree().len());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
