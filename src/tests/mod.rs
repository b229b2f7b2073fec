//! Binary-level tests: end-to-end clock scenarios and command line parsing.

mod clock_tests;
