//! Benchmarks comparing docmark comment rendering vs pulldown-cmark (Markdown)
//!
//! Run with: cargo bench -p docmark-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docmark_core::{lex, normalize, render_to_html, Parser};
use pulldown_cmark::{html, Options, Parser as MdParser};

/// A typical declaration comment
const COMMENT_SAMPLE: &[&str] = &[
    "// Open opens the named file for reading. If successful, methods on",
    "// the returned file can be used for reading; the associated file",
    "// descriptor has mode *O_RDONLY*. If there is an error, it will be",
    "// of type **PathError**. See `OpenFile` for more control.",
    "//",
    "// Example:",
    "//",
    "//\tf, err := os.Open(\"notes.txt\")",
    "//\tif err != nil {",
    "//\t\tlog.Fatal(err)",
    "//\t}",
    "//",
    "// The format is described at https://example.com/doc/files and in",
    "// the [design notes](https://example.com/design#open).",
];

/// Equivalent Markdown content (as close as possible)
const MARKDOWN_SAMPLE: &str = r#"Open opens the named file for reading. If successful, methods on
the returned file can be used for reading; the associated file
descriptor has mode *O_RDONLY*. If there is an error, it will be
of type **PathError**. See `OpenFile` for more control.

Example:

    f, err := os.Open("notes.txt")
    if err != nil {
    	log.Fatal(err)
    }

The format is described at <https://example.com/doc/files> and in
the [design notes](https://example.com/design#open).
"#;

fn sample_len() -> u64 {
    COMMENT_SAMPLE.iter().map(|l| l.len() as u64 + 1).sum()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    group.throughput(Throughput::Bytes(sample_len()));

    group.bench_function("docmark", |b| {
        b.iter(|| {
            let out = render_to_html(black_box(COMMENT_SAMPLE));
            black_box(out.len())
        })
    });

    group.throughput(Throughput::Bytes(MARKDOWN_SAMPLE.len() as u64));

    group.bench_function("markdown_pulldown", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(MARKDOWN_SAMPLE), Options::empty());
            let mut out = String::new();
            html::push_html(&mut out, parser);
            black_box(out.len())
        })
    });

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let text = normalize(COMMENT_SAMPLE);

    group.bench_function("normalize", |b| {
        b.iter(|| black_box(normalize(black_box(COMMENT_SAMPLE)).len()))
    });

    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("lex", |b| {
        b.iter(|| black_box(lex(black_box(&text)).count()))
    });

    group.bench_function("parse", |b| {
        b.iter(|| {
            let root = Parser::new().parse(lex(black_box(&text)));
            black_box(root.children.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    // Long comments, as found on package overviews
    for size in [1, 5, 10, 20].iter() {
        let lines: Vec<&str> = COMMENT_SAMPLE
            .iter()
            .copied()
            .chain(std::iter::once("//"))
            .cycle()
            .take((COMMENT_SAMPLE.len() + 1) * size)
            .collect();
        let markdown = MARKDOWN_SAMPLE.repeat(*size);

        group.throughput(Throughput::Bytes(sample_len() * *size as u64));

        group.bench_with_input(BenchmarkId::new("docmark", size), &lines, |b, lines| {
            b.iter(|| black_box(render_to_html(black_box(lines)).len()))
        });

        group.throughput(Throughput::Bytes(markdown.len() as u64));

        group.bench_with_input(BenchmarkId::new("markdown", size), &markdown, |b, content| {
            b.iter(|| {
                let parser = MdParser::new_ext(black_box(content), Options::empty());
                let mut out = String::new();
                html::push_html(&mut out, parser);
                black_box(out.len())
            })
        });
    }

    group.finish();
}

fn bench_inline(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");

    let docmark_inline =
        ["// This has *emphasis*, **strong**, `code`, [link](https://example.com), and http://x.io."];
    let markdown_inline =
        "This has *emphasis*, **strong**, `code`, [link](https://example.com), and <http://x.io>.";

    group.bench_function("docmark_inline", |b| {
        b.iter(|| black_box(render_to_html(black_box(&docmark_inline)).len()))
    });

    group.bench_function("markdown_inline", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(markdown_inline), Options::empty());
            let mut out = String::new();
            html::push_html(&mut out, parser);
            black_box(out.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_stages, bench_scaling, bench_inline);
criterion_main!(benches);
