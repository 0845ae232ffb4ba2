/*!
geotheorems
=====

This crate generates and classifies Euclidean geometry theorems. Starting
from a handful of loose points (a triangle, a line and a point, ...) it
applies a catalogue of ruler-and-compass constructions breadth-first up to
some iteration depth, realizes each resulting configuration as several
independent numeric pictures, and checks every structurally plausible
relation (collinearity, concurrency, parallelism, ...) for truth across all
of them. Theorems that are implied by a simpler configuration, by a loaded
library of known template theorems, or by composing two other theorems
found in the same configuration are annotated as such rather than reported
as new.

# Usage

This crate is `geotheorems`. To use it as a library add it to your
`Cargo.toml`:

```toml
[dependencies]
geotheorems = "0.1"
```

The `geogen` binary drives the whole pipeline from the command line; see
its `--help` for the flag surface, or call [`runner::run`] directly with a
[`runner::RunnerOptions`].

# Pipeline

* [`kernel`] — the rounded-equality convention and the starting layouts.
* [`model`] — configurations, constructions, theorem shapes.
* [`arggen`] — enumerates the argument combinations a construction can take.
* [`canon`] — canonical forms, used to discard symmetric duplicates.
* [`generate`] — breadth-first expansion of configurations from a seed.
* [`picture`] — numeric realization and cross-picture consistency.
* [`theorem`] — structural candidate enumeration and numeric verification.
* [`filter`] — classifies candidates as trivial, sub-theorem, simpler-
  definable or transitive.
* [`worker`] — the thread pool gluing realization, theorem-finding and
  filtering together.
* [`config_parser`] — the input and template file front end.
* [`report`] — the plain-text report writer.
* [`runner`] — the end-to-end pass over an input directory.
* [`error`] — the crate's error type and propagation policy.
*/

pub mod arggen;
pub mod canon;
pub mod config_parser;
pub mod error;
pub mod filter;
pub mod generate;
pub mod kernel;
pub mod model;
pub mod picture;
pub mod report;
pub mod runner;
pub mod theorem;
pub mod worker;
