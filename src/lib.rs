//! Seats students from class spreadsheets into exam rooms.
//!
//! The pipeline is extract, mix, allocate, export: [`extractor`] reads
//! students out of decoded sheets, [`mixer`] interleaves them across groups and
//! shuffles, [`allocator`] fills rooms in order, and [`export`] turns the
//! result back into named tables for [`codec`] to write.

pub mod allocator;
pub mod codec;
pub mod config;
pub mod data;
pub mod export;
pub mod extractor;
pub mod mixer;
pub mod pipeline;
pub mod server;
