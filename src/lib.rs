//! Sprout: a digital garden tracker.
//!
//! The core is pure: [`viability`] and [`season`] read plant requirements
//! against garden conditions, [`dedup`] finds repeated plant records, and
//! [`reconcile`] plans how an incoming dataset merges into the collection.
//! [`storage`] persists records in SQLite and applies plans atomically;
//! [`cli`] wires it all to the `sprout` command.

pub mod cli;
pub mod config;
pub mod dedup;
pub mod model;
pub mod reconcile;
pub mod season;
pub mod storage;
pub mod text;
pub mod viability;
