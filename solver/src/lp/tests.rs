// © 2023-2024 ETH Zurich
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// any later version.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use super::highs_backend::HighsBackend;
use super::*;

fn small_program() -> LinearProgram {
    let mut builder = LinearProgramBuilder::new("test");
    let x = builder.add_variable(String::from("x"), VarKind::Continuous, 0.0, f64::INFINITY, 1.0);
    let b = builder.add_variable(String::from("b"), VarKind::Binary, -4.0, 7.0, -2.0);
    let n = builder.add_variable(String::from("n"), VarKind::Integer, 0.0, 5.0, 0.0);
    builder
        .add_constraint(String::from("c1"), 1.0, f64::INFINITY, vec![(x, 1.0), (b, 1.0)])
        .unwrap();
    builder
        .add_constraint(String::from("c2"), 0.0, 0.0, vec![(x, 1.0), (n, -3.0)])
        .unwrap();
    builder.build()
}

#[test]
fn lp_file_lists_objective_rows_bounds_and_integers() {
    let mut out = Vec::new();
    small_program().write_lp(&mut out).unwrap();

    let expected = "\\ test
Minimize
 obj: + 1 x - 2 b
Subject To
 c1: + 1 x + 1 b >= 1
 c2: + 1 x - 3 n = 0
Bounds
 x >= 0
 0 <= n <= 5
Generals
 n
Binaries
 b
End
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
fn binary_bounds_are_forced_and_relaxation_drops_integrality() {
    let program = small_program();
    let b = program.variable(Var(1)).unwrap();
    assert_eq!((b.lower(), b.upper()), (0.0, 1.0));
    assert!(program.is_integer());

    let relaxed = program.relaxed();
    assert!(!relaxed.is_integer());
    assert_eq!(relaxed.variable(Var(1)).unwrap().upper(), 1.0);
    assert_eq!(relaxed.number_of_constraints(), 2);
}

#[test]
fn violations_cover_rows_bounds_and_integrality() {
    let program = small_program();
    assert_eq!(program.max_violation(&[3.0, 0.0, 1.0]), 0.0);
    assert!((program.max_violation(&[1.5, 0.0, 0.5]) - 0.5).abs() < 1e-9);
    assert_eq!(program.max_violation(&[0.0, 1.0, 0.0]), 0.0);
    assert!((program.max_violation(&[0.0, 0.0, 0.0]) - 1.0).abs() < 1e-9);
    assert_eq!(program.max_violation(&[0.0]), f64::INFINITY);
    assert_eq!(program.objective_value(&[3.0, 1.0, 1.0]), 1.0);
}

#[test]
fn constraint_with_unknown_variable_is_rejected() {
    let mut builder = LinearProgramBuilder::new("broken");
    builder.add_variable(String::from("x"), VarKind::Continuous, 0.0, 1.0, 0.0);
    let result = builder.add_constraint(String::from("c"), 0.0, 1.0, vec![(Var(3), 1.0)]);
    assert_eq!(result, Err(SolverError::UnknownVariable(3)));
}

#[test]
fn highs_returns_values_and_duals_of_a_linear_program() {
    let mut builder = LinearProgramBuilder::new("lp");
    let x = builder.add_variable(String::from("x"), VarKind::Continuous, 0.0, f64::INFINITY, 1.0);
    let y = builder.add_variable(String::from("y"), VarKind::Continuous, 0.0, f64::INFINITY, 2.0);
    let row = builder
        .add_constraint(String::from("cover"), 1.0, f64::INFINITY, vec![(x, 1.0), (y, 1.0)])
        .unwrap();
    let program = builder.build();

    match HighsBackend.solve(&program, &SolveOptions::default()).unwrap() {
        LpOutcome::Optimal(solution) => {
            assert!((solution.objective() - 1.0).abs() < 1e-6);
            assert!((solution.value(x) - 1.0).abs() < 1e-6);
            assert!(solution.value(y).abs() < 1e-6);
            assert!((solution.dual(row) - 1.0).abs() < 1e-6);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn highs_solves_integer_programs() {
    let mut builder = LinearProgramBuilder::new("mip");
    let x = builder.add_variable(String::from("x"), VarKind::Integer, 0.0, 10.0, -1.0);
    let y = builder.add_variable(String::from("y"), VarKind::Integer, 0.0, 10.0, -1.0);
    builder
        .add_constraint(String::from("cap"), f64::NEG_INFINITY, 3.0, vec![(x, 2.0), (y, 2.0)])
        .unwrap();
    let program = builder.build();

    match HighsBackend.solve(&program, &SolveOptions::default()).unwrap() {
        LpOutcome::Optimal(solution) => {
            assert!((solution.objective() + 1.0).abs() < 1e-6);
            assert!(program.max_violation(solution.values()) < 1e-6);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn highs_detects_infeasibility() {
    let mut builder = LinearProgramBuilder::new("infeasible");
    let x = builder.add_variable(String::from("x"), VarKind::Continuous, 0.0, 1.0, 1.0);
    builder
        .add_constraint(String::from("c"), 2.0, f64::INFINITY, vec![(x, 1.0)])
        .unwrap();
    let outcome = HighsBackend
        .solve(&builder.build(), &SolveOptions::default())
        .unwrap();
    assert_eq!(outcome, LpOutcome::Infeasible);
}

#[test]
fn program_without_variables_is_decided_without_backend() {
    let mut builder = LinearProgramBuilder::new("empty");
    builder
        .add_constraint(String::from("c"), 1.0, 1.0, Vec::new())
        .unwrap();
    let outcome = HighsBackend
        .solve(&builder.build(), &SolveOptions::default())
        .unwrap();
    assert_eq!(outcome, LpOutcome::Infeasible);
}
