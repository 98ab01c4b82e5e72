#![cfg(test)]

pub mod boot_tests;
pub mod global_tests;
