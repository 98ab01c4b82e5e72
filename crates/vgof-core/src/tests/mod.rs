#![cfg(test)]

pub mod common;
pub mod integration;
