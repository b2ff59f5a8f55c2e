//! # Overview
//! "Facility Sim" is a discrete event simulation of a six-station
//! manufacturing facility.  Products flow through a fixed route of
//! stations, drawing material from per-station bins that are refilled by a
//! shared pool of restock devices, while stations occasionally fail and
//! an accident may halt the day.
//!
//! This repository contains:
//!
//! * Random variable framework, for the stochastic processing, restock,
//! maintenance, rejection and accident behaviors.
//! * Facility models, expressed as resumable process state machines.
//! * Output analysis framework, for per-day metrics, cross-day summaries
//! and JSON export.
//! * Simulator engine, with a time-ordered scheduler, FIFO resources and
//! containers, and the multi-day experiment driver.
//!
//! The library is compatible with a wide variety of compilation targets,
//! including WASM.
pub mod input_modeling;
pub mod models;
pub mod output_analysis;
pub mod simulator;
pub mod utils;
