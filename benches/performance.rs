//! Performance benchmarks for cstyle
//!
//! - Single-file check and convert over generated C sources of growing size
//! - Full workflow: discovery plus parallel check across many files
//!
//! ```bash
//! cargo bench
//! cargo bench single_file
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use cstyle::engine::{ExecutionEngine, FileEntry, FileWalker};
use cstyle::rules::{Limits, RuleRegistry, SourceFile};
use cstyle::types::{GlobPattern, Mode};
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// A C file with `functions` functions, mixing clean and offending lines
fn generate_source(functions: usize) -> Vec<String> {
    let mut lines = vec![
        "#include <stdio.h>".to_string(),
        "#include \"Util.h\"".to_string(),
        String::new(),
        "/* generated */".to_string(),
    ];
    for f in 0..functions {
        lines.push(format!("int compute{}(int a, int b) {{", f));
        lines.push("    int total=a+b;".to_string());
        lines.push("\tfloat ratio = 0.5;".to_string());
        lines.push("    if(total==b) { total = total*2; }".to_string());
        lines.push("    printf(\"%d = %f\\n\", total, ratio);".to_string());
        lines.push("    return total;".to_string());
        lines.push("}".to_string());
        lines.push(String::new());
    }
    lines.push("int main(void)".to_string());
    lines.push("{".to_string());
    lines.push("    return compute0(1, 2);".to_string());
    lines.push("}".to_string());
    lines
}

fn create_test_files(count: usize, functions: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let content = generate_source(functions).join("\n");
    for i in 0..count {
        fs::write(temp_dir.path().join(format!("File{}.c", i)), &content).unwrap();
    }
    temp_dir
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_single_file(c: &mut Criterion) {
    let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
    let checker = registry.select(Mode::Check, &[] as &[&str]).unwrap();
    let converter = registry.select(Mode::Convert, &[] as &[&str]).unwrap();

    let mut group = c.benchmark_group("single_file");
    for functions in [10, 100, 1000] {
        let lines = generate_source(functions);
        group.throughput(Throughput::Elements(lines.len() as u64));

        group.bench_with_input(BenchmarkId::new("check", functions), &lines, |b, lines| {
            b.iter(|| black_box(checker.check(&SourceFile::new("Main.c", lines))));
        });
        group.bench_with_input(BenchmarkId::new("convert", functions), &lines, |b, lines| {
            b.iter(|| black_box(converter.convert(&SourceFile::new("Main.c", lines))));
        });
    }
    group.finish();
}

fn bench_full_workflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_workflow");
    group.sample_size(10);

    for file_count in [10, 100] {
        let temp_dir = create_test_files(file_count, 50);
        group.throughput(Throughput::Elements(file_count as u64));

        group.bench_with_input(
            BenchmarkId::new("check", file_count),
            &file_count,
            |b, _| {
                b.iter(|| {
                    let registry = RuleRegistry::builtin(&Limits::default()).unwrap();
                    let walker =
                        FileWalker::new(temp_dir.path(), &[GlobPattern::new("**/*.c")], &[])
                            .unwrap();
                    let files: Vec<FileEntry> = walker.walk().filter_map(Result::ok).collect();

                    let engine =
                        ExecutionEngine::new(registry.select(Mode::Check, &[] as &[&str]).unwrap());
                    black_box(engine.check(&files).total_diagnostics())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(rule_benches, bench_single_file);
criterion_group!(workflow_benches, bench_full_workflow);
criterion_main!(rule_benches, workflow_benches);
