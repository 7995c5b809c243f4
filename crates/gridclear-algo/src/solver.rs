//! LP backends.
//!
//! The engine only needs "did it solve, and what are the values", so backends
//! sit behind [`LpBackend`]. [`GoodLpBackend`] hands the dense problem to
//! `good_lp` with Clarabel (always available) or HiGHS (`solver-highs`).

use crate::error::{ClearingError, ClearingResult};
use crate::formulation::LpProblem;
use good_lp::solvers::clarabel::clarabel;
#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Constraint, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LpSolverKind {
    #[default]
    Clarabel,
    #[cfg(feature = "solver-highs")]
    Highs,
}

impl LpSolverKind {
    /// Backends compiled into this build
    pub const COMPILED: &'static [LpSolverKind] = &[
        LpSolverKind::Clarabel,
        #[cfg(feature = "solver-highs")]
        LpSolverKind::Highs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LpSolverKind::Clarabel => "clarabel",
            #[cfg(feature = "solver-highs")]
            LpSolverKind::Highs => "highs",
        }
    }
}

impl FromStr for LpSolverKind {
    type Err = ClearingError;

    /// Case-insensitive; names of backends left out of the build are rejected.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::COMPILED
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ClearingError::UnknownSolver {
                name: value.to_string(),
                supported: Self::COMPILED
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

impl fmt::Display for LpSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one solve attempt
#[derive(Debug, Clone, Default, Serialize)]
pub struct LpOutcome {
    pub success: bool,
    pub message: String,
    /// Variable values in column order; empty unless `success`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
}

impl LpOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            values: Vec::new(),
            objective: None,
        }
    }
}

/// Solver collaborator used by the clearing engine.
pub trait LpBackend: Send + Sync {
    /// Backend identifier (e.g. "clarabel")
    fn id(&self) -> &str;

    /// Attempt the problem.
    ///
    /// Infeasibility may be reported either as an unsuccessful outcome or as
    /// [`ClearingError::Infeasible`]; the engine treats both as non-fatal.
    fn solve(&self, problem: &LpProblem) -> ClearingResult<LpOutcome>;
}

/// `good_lp` backed solver
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpBackend {
    kind: LpSolverKind,
}

impl GoodLpBackend {
    pub fn new(kind: LpSolverKind) -> Self {
        Self { kind }
    }
}

impl LpBackend for GoodLpBackend {
    fn id(&self) -> &str {
        self.kind.as_str()
    }

    fn solve(&self, problem: &LpProblem) -> ClearingResult<LpOutcome> {
        check_dimensions(problem)?;

        let mut vars = variables!();
        let columns: Vec<Variable> = problem
            .bounds
            .iter()
            .map(|&(lo, hi)| vars.add(variable().min(lo).max(hi)))
            .collect();

        let objective = linear_expression(&problem.objective, &columns);
        let mut constraints: Vec<Constraint> =
            Vec::with_capacity(problem.a_eq.len() + problem.a_ub.len());
        for (row, &rhs) in problem.a_eq.iter().zip(&problem.b_eq) {
            let lhs = linear_expression(row, &columns);
            constraints.push(constraint!(lhs == rhs));
        }
        for (row, &rhs) in problem.a_ub.iter().zip(&problem.b_ub) {
            let lhs = linear_expression(row, &columns);
            constraints.push(constraint!(lhs <= rhs));
        }

        let unsolved = vars.minimise(objective);
        let solved = match self.kind {
            LpSolverKind::Clarabel => solve_model(unsolved.using(clarabel), constraints, &columns),
            #[cfg(feature = "solver-highs")]
            LpSolverKind::Highs => solve_model(unsolved.using(highs), constraints, &columns),
        };

        match solved {
            Ok(values) => {
                let objective = problem
                    .objective
                    .iter()
                    .zip(&values)
                    .map(|(c, x)| c * x)
                    .sum();
                Ok(LpOutcome {
                    success: true,
                    message: "optimal".to_string(),
                    values,
                    objective: Some(objective),
                })
            }
            Err(ResolutionError::Infeasible) => {
                Err(ClearingError::Infeasible("node balance cannot be met".into()))
            }
            Err(other) => Ok(LpOutcome::failed(other.to_string())),
        }
    }
}

fn solve_model<M>(
    model: M,
    constraints: Vec<Constraint>,
    columns: &[Variable],
) -> Result<Vec<f64>, ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    let model = constraints.into_iter().fold(model, |m, c| m.with(c));
    let solution = model.solve()?;
    Ok(columns.iter().map(|&v| solution.value(v)).collect())
}

fn linear_expression(coefficients: &[f64], columns: &[Variable]) -> Expression {
    coefficients
        .iter()
        .zip(columns)
        .filter(|(c, _)| **c != 0.0)
        .fold(Expression::from(0.0), |acc, (&c, &v)| acc + c * v)
}

fn check_dimensions(problem: &LpProblem) -> ClearingResult<()> {
    let n = problem.objective.len();
    let rows_ok = problem.a_eq.iter().chain(&problem.a_ub).all(|row| row.len() == n);
    if problem.bounds.len() != n
        || !rows_ok
        || problem.a_eq.len() != problem.b_eq.len()
        || problem.a_ub.len() != problem.b_ub.len()
    {
        return Err(ClearingError::Solver(format!(
            "inconsistent problem dimensions for {n} variables"
        )));
    }
    Ok(())
}
