//! Trait-based HTML template engine for MPA.
//!
//! This crate provides:
//! - [`TemplateEngine`]: the engine seam: render a template string against a
//!   JSON context
//! - [`Interpolator`]: the built-in backend, substituting `{{ dotted.path }}`
//!   placeholders
//! - [`build_context`]: the three-layer render-context merge used by every
//!   render site
//!
//! The expression syntax is deliberately small; anything richer belongs in a
//! custom [`TemplateEngine`] implementation plugged in at the same seam.
//!
//! # Quick Start
//!
//! ```
//! use mpa_render::{EngineOptions, Interpolator, TemplateEngine, build_context};
//! use serde_json::{Map, json};
//!
//! let mut defaults = Map::new();
//! defaults.insert("title".to_owned(), json!("My Site"));
//! let context = build_context(&defaults, json!({"heading": "Users"}));
//!
//! let engine = Interpolator;
//! let html = engine
//!     .render("<h1>{{ info.heading }} | {{ title }}</h1>", &context, &EngineOptions::default())
//!     .unwrap();
//! assert_eq!(html, "<h1>Users | My Site</h1>");
//! ```

mod context;
mod engine;
mod interpolate;

pub use context::{PAGE_DATA_KEY, build_context};
pub use engine::{EngineOptions, RenderError, TemplateEngine};
pub use interpolate::Interpolator;
