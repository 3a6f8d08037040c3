//! Runtime module: process lifecycle: logging, boot, run.

pub mod boot;
pub mod run;
