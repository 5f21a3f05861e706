//! A chronological DPLL SAT solver.
//!
//! Formulas in conjunctive normal form are decided by an iterative DPLL search
//! over a two-watched-literal propagation engine. A recursive copy-and-branch
//! search is included as a baseline behind the same [`Solver`](sat::solver::Solver)
//! trait.
//!
//! ```
//! use dpll_solver::sat::cnf::Cnf;
//! use dpll_solver::sat::dpll::Dpll;
//! use dpll_solver::sat::solver::Solver;
//!
//! let cnf: Cnf = Cnf::new(2, vec![vec![1, 2], vec![-1, -2]]).unwrap();
//! let mut solver: Dpll = Dpll::new(cnf);
//! let model = solver.solve().expect("satisfiable");
//! assert!(model.check(1) != model.check(2));
//! ```

/// The `sat` module holds the solver: clause store, watch index, trail,
/// propagation, the search drivers and DIMACS input.
pub mod sat;
