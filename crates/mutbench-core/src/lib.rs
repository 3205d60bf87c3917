//! Core logic for the mutbench defect-analysis experiment.
//!
//! The pipeline side ([`driver`], [`analyzer`], [`ledger`]) executes one
//! unit of work per `(defect, variant)` pair against external benchmark
//! tooling and records each completed unit durably before moving on, so an
//! interrupted run resumes without redoing or corrupting work.
//!
//! The audit side ([`activeset`], [`reconcile`]) is independent: it reads
//! the full ledger plus the authoritative active-bug set and classifies
//! every defect's completeness. It never feeds back into the driver.

pub mod activeset;
pub mod analyzer;
pub mod coverage;
pub mod driver;
pub mod ledger;
pub mod manifest;
pub mod mutation;
pub mod reconcile;
pub mod tool;
