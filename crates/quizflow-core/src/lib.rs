//! Quizflow Core
//!
//! Resolves a quiz configuration graph into per-node validation status,
//! predicted allocations, route badges and modifier flags.
//!
//! # Core Concepts
//!
//! - [`Resolver`]: one `resolve` call per graph snapshot
//! - [`ResolverConfig`]: tolerances and conventions, loadable from TOML
//! - [`TargetTotal`]: the quiz's song count, exact or a range
//! - [`Resolution`]: fresh, derived output; the input graph is never written
//!
//! # Example
//!
//! ```rust
//! use quizflow_allocation::{FilterKind, FilterSettings};
//! use quizflow_core::{Resolver, ResolverConfig, TargetTotal};
//! use quizflow_graph::{ConfigGraph, ConfigNode, NodeId};
//!
//! let filter = FilterSettings::new(FilterKind::SongTypes)
//!     .with_fixed("openings", 70.0)
//!     .with_fixed("endings", 50.0);
//! let mut graph = ConfigGraph::new();
//! graph.add_node(ConfigNode::filter("types", filter)).unwrap();
//!
//! let resolver = Resolver::new(ResolverConfig::default()).unwrap();
//! let resolution = resolver.resolve(&graph, TargetTotal::Exact(20.0)).unwrap();
//! assert!(!resolution.is_sampleable());
//!
//! let id = NodeId::new("types");
//! resolver.apply_quick_fix(&mut graph, &id, TargetTotal::Exact(20.0)).unwrap();
//! assert!(resolver.resolve(&graph, TargetTotal::Exact(20.0)).unwrap().is_sampleable());
//! ```
//!
//! # Features
//!
//! - `parallel`: evaluate filter nodes on the rayon thread pool

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cache;
mod config;
mod error;
mod outcome;
mod resolver;
mod target;

pub use cache::{AllocationCache, CacheStats, ContentHash};
pub use config::ResolverConfig;
pub use error::{ConfigError, ResolveError};
pub use outcome::{FilterOutcome, NodeAnnotations, Resolution};
pub use resolver::Resolver;
pub use target::{EffectiveTarget, TargetTotal};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
