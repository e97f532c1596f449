//! # slothouse-ranking
//!
//! **Pure deterministic slot ranking for SlotHouse.**
//!
//! Ranking turns the cumulative bid balances of an ended auction into a
//! slot assignment. It has:
//!
//! - **Zero side effects**: no custody, no balance mutation
//! - **Deterministic output**: same standings -> same assignment, same root
//! - **One canonical order**: descending balance, ties by earliest first bid
//! - **Fixed mapping**: rank 1 -> slot 1, rank k -> slot k
//!
//! A caller-supplied winner order goes through [`verify_supplied_order`],
//! which accepts exactly the canonical assignment and nothing else.

pub mod determinism;
pub mod ranking;
pub mod verify;

pub use determinism::{
    compute_ranking_root, recorded_assignments, verify_ranking_root, verify_recorded_ranking,
};
pub use ranking::{Ranking, SlotAssignment, canonical_order, compare_standings, rank_bidders};
pub use verify::verify_supplied_order;
