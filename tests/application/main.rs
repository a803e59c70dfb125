//! End-to-end tests: a login application built on a facade.

mod support;
