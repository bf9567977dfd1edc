use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cliquecol_rs::clique::{preprocess, GreedyCliqueOracle};
use cliquecol_rs::graph::greedy;
use cliquecol_rs::solver::{Options, Solver};
use cliquecol_rs::Graph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Queen graph: squares of an n x n board, adjacent when a queen attacks
fn queen_graph(n: usize) -> Graph {
    let mut graph = Graph::new(n * n);
    for a in 0..n * n {
        for b in a + 1..n * n {
            let (ra, ca) = ((a / n) as isize, (a % n) as isize);
            let (rb, cb) = ((b / n) as isize, (b % n) as isize);
            if ra == rb || ca == cb || (ra - rb).abs() == (ca - cb).abs() {
                graph.add_edge(a, b);
            }
        }
    }
    graph
}

fn random_graph(n: usize, p: f64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new(n);
    for u in 0..n {
        for v in u + 1..n {
            if rng.gen_bool(p) {
                graph.add_edge(u, v);
            }
        }
    }
    graph
}

fn exact() -> Options {
    Options {
        timeout: None,
        ..Options::default()
    }
}

fn solver_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver");
    group.sample_size(20);

    let queen5 = queen_graph(5);
    group.bench_function("queen5_5", |b| {
        b.iter(|| {
            let solver = Solver::new(exact());
            let _ = solver.solve(black_box(&queen5));
        });
    });

    let sparse = random_graph(40, 0.2, 1);
    group.bench_function("random_40_0.2", |b| {
        b.iter(|| {
            let solver = Solver::new(exact());
            let _ = solver.solve(black_box(&sparse));
        });
    });

    let dense = random_graph(30, 0.6, 2);
    group.bench_function("random_30_0.6", |b| {
        b.iter(|| {
            let solver = Solver::new(exact());
            let _ = solver.solve(black_box(&dense));
        });
    });

    group.finish();
}

fn preprocessing_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("preprocessing");

    let graph = random_graph(200, 0.5, 3);
    group.bench_function("cliques_200_0.5", |b| {
        b.iter(|| preprocess(black_box(&graph), &mut GreedyCliqueOracle));
    });
    group.bench_function("dsatur_200_0.5", |b| {
        b.iter(|| greedy::dsatur(black_box(&graph)));
    });

    group.finish();
}

criterion_group!(benches, solver_benchmarks, preprocessing_benchmarks);
criterion_main!(benches);
