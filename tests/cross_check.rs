//! Randomised checks against a truth-table oracle, plus invariant checks on
//! random decide / propagate / undo sequences.

use dpll_solver::sat::assignment::Assignment;
use dpll_solver::sat::cnf::Cnf;
use dpll_solver::sat::dpll::Dpll;
use dpll_solver::sat::literal::{DoubleLiteral, Literal, NegativeLiteral};
use dpll_solver::sat::propagation::Propagator;
use dpll_solver::sat::recursive::Recursive;
use dpll_solver::sat::solver::{Solver, SolverConfig};
use dpll_solver::sat::trail::{DecisionStack, Reason, Trail};
use dpll_solver::sat::variable_selection::{FixedOrder, RandomOrder, VariableSelection};
use std::marker::PhantomData;

#[derive(Debug, Clone)]
struct Config<L: Literal, V>(PhantomData<(L, V)>);

impl<L: Literal, V: VariableSelection> SolverConfig for Config<L, V> {
    type Literal = L;
    type VariableSelector = V;
}

fn random_formula(rng: &mut fastrand::Rng) -> (usize, Vec<Vec<i32>>) {
    let num_vars = rng.usize(1..=8);
    let num_clauses = rng.usize(0..=num_vars * 5);
    let n = i32::try_from(num_vars).unwrap();
    let clauses = (0..num_clauses)
        .map(|_| {
            let width = rng.usize(1..=4);
            (0..width)
                .map(|_| {
                    let v = rng.i32(1..=n);
                    if rng.bool() { v } else { -v }
                })
                .collect()
        })
        .collect();
    (num_vars, clauses)
}

fn brute_force(num_vars: usize, clauses: &[Vec<i32>]) -> bool {
    (0..1u32 << num_vars).any(|bits| {
        clauses.iter().all(|c| {
            c.iter().any(|&l| {
                let value = bits >> (l.unsigned_abs() - 1) & 1 == 1;
                value == (l > 0)
            })
        })
    })
}

fn check<C: SolverConfig, S: Solver<C>>(num_vars: usize, clauses: &[Vec<i32>], expected: bool) {
    let cnf: Cnf<C::Literal> = Cnf::new(num_vars, clauses).unwrap();
    let mut solver = S::new(cnf.clone());
    match solver.solve() {
        Some(model) => {
            assert!(expected, "reported sat for unsat formula {clauses:?}");
            assert!(cnf.verify(&model), "bad model {model} for {clauses:?}");
            assert_eq!(model.len(), cnf.num_vars);
        }
        None => assert!(!expected, "reported unsat for sat formula {clauses:?}"),
    }
}

#[test]
fn agrees_with_truth_table() {
    let mut rng = fastrand::Rng::with_seed(0xC0FFEE);
    let mut sat = 0;

    for _ in 0..500 {
        let (num_vars, clauses) = random_formula(&mut rng);
        let expected = brute_force(num_vars, &clauses);
        sat += usize::from(expected);

        check::<Config<DoubleLiteral, FixedOrder>, Dpll<_>>(num_vars, &clauses, expected);
        check::<Config<NegativeLiteral, FixedOrder>, Dpll<_>>(num_vars, &clauses, expected);
        check::<Config<DoubleLiteral, RandomOrder>, Dpll<_>>(num_vars, &clauses, expected);
        check::<Config<DoubleLiteral, FixedOrder>, Recursive<_>>(num_vars, &clauses, expected);
    }

    assert!(sat > 0 && sat < 500, "{sat} of 500 satisfiable");
}

#[test]
fn invariants_hold_after_solve() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..200 {
        let (num_vars, clauses) = random_formula(&mut rng);
        let cnf: Cnf = Cnf::new(num_vars, &clauses).unwrap();
        let mut solver: Dpll = Dpll::new(cnf);
        solver.solve();
        assert!(solver.invariants_hold());
        assert!(solver.decision_level() <= num_vars);
        assert!(solver.trail.len() <= num_vars);
    }
}

/// Random decisions of either polarity and random partial undos, checking
/// the watch mirror and trail/assignment agreement after every step.
#[test]
fn invariants_hold_under_random_undo() {
    let mut rng = fastrand::Rng::with_seed(99);

    for _ in 0..200 {
        let (num_vars, clauses) = random_formula(&mut rng);
        let cnf: Cnf<DoubleLiteral> = Cnf::new(num_vars, &clauses).unwrap();
        if cnf.has_empty_clause() {
            continue;
        }

        let mut assignment = Assignment::new(cnf.num_vars);
        let mut trail = Trail::new(cnf.num_vars);
        let mut decisions = DecisionStack::new();
        let mut propagator = Propagator::new();

        let mut forced = None;
        for _ in 0..30 {
            let result = propagator.propagate(&cnf, &mut assignment, &mut trail, forced.take());

            assert!(propagator.is_idle());
            assert!(propagator.watches().is_mirrored());
            assert!(assignment.is_consistent());
            assert!(trail.matches(&assignment));

            let undo = result.is_err() || rng.u8(..4) == 0;
            if undo {
                let Some(mark) = decisions.pop() else { break };
                let before = trail.len();
                let step = trail.backstep_to(&mut assignment, mark).unwrap();
                assert_eq!(step.reason, Reason::Decision);
                assert_eq!(trail.len(), mark);
                assert!(before > mark);
                assert!(trail.matches(&assignment));
                continue;
            }

            let open: Vec<_> = assignment.open_variables().collect();
            if open.is_empty() {
                break;
            }
            let var = open[rng.usize(..open.len())];
            decisions.push(trail.len());
            forced = Some((DoubleLiteral::new(var, rng.bool()), Reason::Decision));
        }
    }
}

#[test]
fn repropagating_assigned_literal_is_noop() {
    let cnf: Cnf = Cnf::new(3, vec![vec![-1, 2], vec![-2, 3]]).unwrap();
    let mut assignment = Assignment::new(3);
    let mut trail = Trail::new(3);
    let mut propagator = Propagator::new();

    let x1 = DoubleLiteral::from_i32(1);
    propagator
        .propagate(&cnf, &mut assignment, &mut trail, [(x1, Reason::Decision)])
        .unwrap();
    assert_eq!(trail.len(), 3);

    let (a, t, w) = (assignment.clone(), trail.clone(), propagator.watches().clone());
    for lit in [1, 2, 3] {
        propagator
            .propagate(
                &cnf,
                &mut assignment,
                &mut trail,
                [(DoubleLiteral::from_i32(lit), Reason::Decision)],
            )
            .unwrap();
    }

    assert_eq!(assignment, a);
    assert_eq!(trail, t);
    assert_eq!(propagator.watches(), &w);
}
