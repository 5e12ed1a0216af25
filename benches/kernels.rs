use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use parla::{CsrMatrix, SharedVector, Team, TeamOptions, VectorSet};

fn tridiagonal(n: usize) -> CsrMatrix<f64> {
    let mut triplets = Vec::with_capacity(3 * n);
    for i in 0..n {
        triplets.push((i, i, 4.0));
        if i > 0 {
            triplets.push((i, i - 1, -1.0));
        }
        if i + 1 < n {
            triplets.push((i, i + 1, -1.0));
        }
    }
    CsrMatrix::from_triplets(n, n, &triplets).unwrap()
}

fn bench_dot(c: &mut Criterion) {
    let n = 1 << 20;
    let a: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
    let b: Vec<f64> = (0..n).map(|i| (i as f64).cos()).collect();
    let set = VectorSet { inputs: vec![&a[..], &b[..]], outputs: vec![] };

    let mut group = c.benchmark_group("dot");
    for workers in [1, 2, 4, 8] {
        let team = Team::new(TeamOptions::default().with_workers(workers));
        group.bench_with_input(BenchmarkId::from_parameter(workers), &team, |ben, team| {
            ben.iter(|| {
                team.run(&set, |pla, set| {
                    // Repeat so team start-up does not dominate.
                    let mut acc = 0.0;
                    for _ in 0..10 {
                        acc += pla.dot(set.inputs[0], set.inputs[1])?;
                    }
                    black_box(acc);
                    Ok::<(), parla::PlaError>(())
                })
                .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_spmv(c: &mut Criterion) {
    let n = 1 << 18;
    let a = tridiagonal(n);
    let x: Vec<f64> = (0..n).map(|i| (i as f64).cos()).collect();
    let mut y = vec![0.0; n];
    let set = VectorSet { inputs: vec![&x[..]], outputs: vec![SharedVector::new(&mut y)] };

    let mut group = c.benchmark_group("spmv");
    for workers in [1, 2, 4, 8] {
        let team = Team::new(TeamOptions::default().with_workers(workers));
        group.bench_with_input(BenchmarkId::from_parameter(workers), &team, |ben, team| {
            ben.iter(|| {
                team.run(&set, |pla, set| {
                    for _ in 0..10 {
                        pla.spmv(&a, set.inputs[0], &set.outputs[0])?;
                    }
                    Ok::<(), parla::PlaError>(())
                })
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dot, bench_spmv);
criterion_main!(benches);
