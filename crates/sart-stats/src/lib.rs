//! Numeric primitives for summarizing experiment performance data.
//!
//! This crate collects the small, pure calculations the analysis layer is
//! built on:
//!
//! - **Descriptive statistics**: means, weighted means, and min/max/mean
//!   summaries of a series
//! - **Linear regression**: ordinary least-squares slope and intercept
//! - **Trapezoidal integration**: area under a unit-spaced series
//! - **Change counting**: how often a series moves up or down between
//!   consecutive observations
//! - **Decimal rounding**: fixed-precision rounding applied to exported values
//!
//! All functions operate on plain `f64` values, take no dependencies, and
//! return `None` rather than panicking on degenerate input (empty series,
//! zero total weight, too few points to fit).
//!
//! # Examples
//!
//! ```
//! use sart_stats::descriptive::mean;
//! use sart_stats::regression::LinearFit;
//!
//! let series = [2.0, 4.0, 6.0];
//! assert_eq!(mean(series), Some(4.0));
//!
//! let fit = LinearFit::fit([(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
//! assert_eq!(fit.slope, 2.0);
//! ```

pub mod change;
pub mod descriptive;
pub mod regression;
pub mod round;
pub mod trapezoid;
