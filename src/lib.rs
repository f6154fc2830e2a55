//! Diagram editor core and its HTTP host.
//!
//! A document of nodes and links per diagram kind (flowchart, UML class,
//! ER), edited manually or replaced wholesale by a generation service, with
//! one cached SVG render that tracks whether it still matches the document.

pub mod artifact;
pub mod config;
pub mod diagram;
pub mod editor;
pub mod error;
pub mod reconcile;
pub mod remote;
pub mod routes;
pub mod session;
pub mod state;
