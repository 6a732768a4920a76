//! Benchmark tests for the classifier walk and full scans

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rusty_reclaim::probe::FsSizeProbe;
use rusty_reclaim::scanner::{Classifier, ScanOptions, Scanner};
use rusty_reclaim::PatternCatalog;
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

/// Create `projects` fake projects, each with a node_modules tree, a venv and
/// some source files that the walk has to look at.
fn create_workspace(projects: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    for p in 0..projects {
        let project = root.join(format!("project{}", p));
        let modules = project.join("node_modules");
        for m in 0..5 {
            let package = modules.join(format!("pkg{}", m));
            fs::create_dir_all(&package).unwrap();
            let mut file = File::create(package.join("index.js")).unwrap();
            file.write_all(&vec![b'x'; 2048]).unwrap();
        }

        let venv = project.join("venv");
        fs::create_dir_all(venv.join("lib")).unwrap();
        File::create(venv.join("pyvenv.cfg")).unwrap();

        let src = project.join("src").join("app");
        fs::create_dir_all(&src).unwrap();
        for f in 0..10 {
            let mut file = File::create(src.join(format!("mod{}.py", f))).unwrap();
            file.write_all(&vec![b'y'; 512]).unwrap();
        }
    }

    dir
}

fn classifier() -> Classifier {
    Classifier::new(PatternCatalog::new(), Box::new(FsSizeProbe::new()))
}

fn benchmark_discovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("discovery");
    let classifier = classifier();
    let options = ScanOptions::new().with_docker(false);

    for size in [10, 50, 200].iter() {
        let dir = create_workspace(*size);
        group.bench_with_input(BenchmarkId::new("walk_only", size), size, |b, _| {
            b.iter(|| {
                classifier
                    .discover(black_box(dir.path()), &options)
                    .map(|d| d.count())
            })
        });
    }

    group.finish();
}

fn benchmark_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let dir = create_workspace(50);

    for threads in [1, 4].iter() {
        let options = ScanOptions::new().with_docker(false).with_threads(*threads);
        let scanner = Scanner::with_defaults(PatternCatalog::new(), &options);
        group.bench_with_input(BenchmarkId::new("threads", threads), threads, |b, _| {
            b.iter(|| scanner.scan(black_box(dir.path()), &options))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_discovery, benchmark_scan);
criterion_main!(benches);
