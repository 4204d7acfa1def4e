//! # sim-cec: simulation-based combinational equivalence checking
//!
//! **`sim-cec`** decides whether two combinational logic networks compute the same
//! boolean function by simulating their [miter][crate::miter] over the complete
//! input space.
//!
//! ## How it works
//!
//! The two networks are combined into a miter whose outputs are 1 exactly where the
//! outputs of the two networks disagree. The miter is simulated with bit-parallel truth tables:
//! the first `split_var` inputs are packed into one simulation vector of
//! `2^split_var` bits, and the remaining inputs are enumerated in
//! `2^(n - split_var)` rounds. Any set output bit proves the networks different;
//! if every round passes, they are equivalent.
//!
//! The check is exhaustive, so it is limited to networks with at most 40 inputs.
//! Larger instances yield [`CecResult::Undetermined`][crate::cec::CecResult].
//!
//! ## Basic Usage
//!
//! ```rust
//! use sim_cec::cec::simulation_cec;
//! use sim_cec::network::LogicNetwork;
//!
//! let mut and = LogicNetwork::new();
//! let a = and.add_input();
//! let b = and.add_input();
//! let c = and.add_input();
//! let f = and.create_nary_and(&[a, b, c]);
//! and.add_output(f);
//!
//! let mut or = LogicNetwork::new();
//! let a = or.add_input();
//! let b = or.add_input();
//! let c = or.add_input();
//! let f = or.create_nary_or(&[a, b, c]);
//! or.add_output(f);
//!
//! let report = simulation_cec(&and, &or);
//! assert!(report.result.is_different());
//! assert_eq!(report.stats.split_var, 3);
//! assert_eq!(report.stats.rounds, 1);
//! ```
//!
//! ## Core Components
//!
//! - **[`cec`]**: split planning, the round driver and the entry points.
//! - **[`network`]**: the [`Network`][crate::network::Network] trait the checker is written against, and [`LogicNetwork`][crate::network::LogicNetwork].
//! - **[`miter`]**: miter construction.
//! - **[`simulation`]**: bottom-up simulation over [`truth_table`]s.
//! - **[`aiger`]**: reading networks from ASCII AIGER files.

pub mod aiger;
pub mod cec;
pub mod gate;
pub mod miter;
pub mod network;
pub mod patterns;
pub mod signal;
pub mod simulation;
pub mod truth_table;
