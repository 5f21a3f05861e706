use criterion::{Criterion, criterion_group, criterion_main};
use dpll_solver::sat::cnf::Cnf;
use dpll_solver::sat::dpll::Dpll;
use dpll_solver::sat::literal::{DoubleLiteral, Literal, NegativeLiteral};
use dpll_solver::sat::recursive::Recursive;
use dpll_solver::sat::solver::{DefaultConfig, Solver, SolverConfig};
use dpll_solver::sat::variable_selection::{FixedOrder, RandomOrder, VariableSelection};
use std::hint::black_box;
use std::marker::PhantomData;
use std::time::Duration;

#[derive(Debug, Clone)]
struct SelectorConfig<V: VariableSelection>(PhantomData<V>);

impl<V: VariableSelection> SolverConfig for SelectorConfig<V> {
    type Literal = DoubleLiteral;
    type VariableSelector = V;
}

#[derive(Debug, Clone)]
struct LiteralConfig<L: Literal>(PhantomData<L>);

impl<L: Literal> SolverConfig for LiteralConfig<L> {
    type Literal = L;
    type VariableSelector = FixedOrder;
}

/// Uniform random 3-SAT with `num_clauses` clauses over `num_vars`
/// variables. Near 4.26 clauses per variable roughly half are satisfiable.
fn random_3sat(rng: &mut fastrand::Rng, num_vars: usize, num_clauses: usize) -> Vec<Vec<i32>> {
    let n = i32::try_from(num_vars).unwrap();
    (0..num_clauses)
        .map(|_| {
            (0..3)
                .map(|_| {
                    let v = rng.i32(1..=n);
                    if rng.bool() { v } else { -v }
                })
                .collect()
        })
        .collect()
}

/// `holes + 1` pigeons in `holes` holes. Always unsatisfiable, and hard for
/// DPLL without learning.
fn pigeonhole(holes: i32) -> Vec<Vec<i32>> {
    let pigeons = holes + 1;
    let var = |p: i32, h: i32| p * holes + h + 1;
    let mut clauses: Vec<Vec<i32>> = (0..pigeons)
        .map(|p| (0..holes).map(|h| var(p, h)).collect())
        .collect();
    for h in 0..holes {
        for p in 0..pigeons {
            for q in p + 1..pigeons {
                clauses.push(vec![-var(p, h), -var(q, h)]);
            }
        }
    }
    clauses
}

fn formulas<L: Literal>(raw: &[Vec<Vec<i32>>], num_vars: usize) -> Vec<Cnf<L>> {
    raw.iter()
        .map(|clauses| Cnf::new(num_vars, clauses).unwrap())
        .collect()
}

fn solve_all<C: SolverConfig, S: Solver<C>>(cnfs: &[Cnf<C::Literal>]) {
    for cnf in cnfs {
        let mut state: S = Solver::new(cnf.clone());
        black_box(state.solve());
    }
}

fn bench_3sat(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(20);
    let raw: Vec<_> = (0..50).map(|_| random_3sat(&mut rng, 20, 91)).collect();
    let cnfs = formulas::<DoubleLiteral>(&raw, 20);

    let mut group = c.benchmark_group("3sat uf20-91 - strategy");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("Dpll", |b| {
        b.iter(|| solve_all::<DefaultConfig, Dpll>(&cnfs));
    });
    group.bench_function("Recursive", |b| {
        b.iter(|| solve_all::<DefaultConfig, Recursive>(&cnfs));
    });
    group.finish();
}

fn bench_variable_selection(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(50);
    let raw: Vec<_> = (0..20).map(|_| random_3sat(&mut rng, 50, 218)).collect();
    let cnfs = formulas::<DoubleLiteral>(&raw, 50);

    let mut group = c.benchmark_group("3sat uf50-218 - variable selection");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("FixedOrder", |b| {
        b.iter(|| solve_all::<SelectorConfig<FixedOrder>, Dpll<_>>(&cnfs));
    });
    group.bench_function("RandomOrder", |b| {
        b.iter(|| solve_all::<SelectorConfig<RandomOrder>, Dpll<_>>(&cnfs));
    });
    group.finish();
}

fn bench_literals(c: &mut Criterion) {
    let raw = vec![pigeonhole(6)];
    let num_vars = 7 * 6;
    let double = formulas::<DoubleLiteral>(&raw, num_vars);
    let negative = formulas::<NegativeLiteral>(&raw, num_vars);

    let mut group = c.benchmark_group("pigeonhole 7/6 - literal layout");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));

    group.bench_function("Double", |b| {
        b.iter(|| solve_all::<LiteralConfig<DoubleLiteral>, Dpll<_>>(&double));
    });
    group.bench_function("Negative", |b| {
        b.iter(|| solve_all::<LiteralConfig<NegativeLiteral>, Dpll<_>>(&negative));
    });
    group.finish();
}

criterion_group!(benches, bench_3sat, bench_variable_selection, bench_literals);
criterion_main!(benches);
