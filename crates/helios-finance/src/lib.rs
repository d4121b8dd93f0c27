//! # helios-finance: Pro-Forma Construction and LCOE Solving
//!
//! Builds the 22-row project pro-forma (two construction years, twenty
//! operating years, and an NPV summary) from annual dispatch aggregates and
//! a trial energy price, then solves for the levelized cost of electricity:
//! the constant $/MWh price at which the NPV of after-tax equity cash flow
//! is zero.
//!
//! Everything here is a pure function of its inputs; there is no I/O and no
//! shared state, so the solver can rebuild the pro-forma as often as it
//! likes.

pub mod capex;
pub mod debt;
pub mod proforma;
pub mod solver;

pub use capex::CapexSummary;
pub use debt::{annual_debt_payment, DebtSchedule};
pub use proforma::{ConstructionColumns, NpvSummary, OperatingColumns, ProForma};
pub use solver::{solve_lcoe, LcoeSolution};
