//! Quick-reference shortcodes for developer documentation.
//!
//! Content authors write `[function name="wp_list_pluck"]`, `[hook ..]`,
//! `[class ..]` or `[method name=".." class=".."]` in documentation text;
//! this crate locates those tags and turns each into a link to the
//! entity's reference page:
//!
//! ```
//! use quickref::{EntityKind, HomeUrl, PostTypeRegistry, Resolver};
//!
//! let registry = PostTypeRegistry::default();
//! let home = HomeUrl::new("https://developer.wordpress.org");
//! let resolver = Resolver::new(&registry, &home);
//!
//! let html = resolver.resolve(EntityKind::Class, [("name", "WP_Query")]);
//! assert_eq!(
//!     html,
//!     r#"<a href="https://developer.wordpress.org/reference/class/wp_query/" class="quick-reference class">WP_Query</a>"#
//! );
//! ```

pub mod config;
pub mod error;
pub mod expand;
pub mod registry;
pub mod resolver;
pub mod sanitize;
pub mod scanner;
pub mod shortcode;
pub mod types;

pub use crate::error::Error;
pub use crate::expand::expand_shortcodes;
pub use crate::registry::{EntityRegistry, PostTypeRegistry};
pub use crate::resolver::{HomeUrl, Identity, ReferenceLink, Resolver, SiteUrl, TitleTransform, Unresolved};
pub use crate::types::{EntityKind, Occurrence, ShortcodeRequest};
