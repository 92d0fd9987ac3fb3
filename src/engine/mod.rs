pub mod context;
pub mod fields;
pub mod index;
pub mod literal;
pub mod matcher;
pub mod node_types;
pub mod parser;
pub mod scope;
pub mod sources;

pub use context::{Context, SourcePosition};
pub use fields::{FieldKey, FieldPath};
pub use index::BindingIndex;
pub use matcher::{SiteMatcher, TableEntry, TableTarget};
pub use node_types::NodeCategory;
pub use sources::Unresolved;

use std::path::Path;
use tracing::debug;

use crate::error::Result;
use parser::ParsedSource;

/// Lookup functions recognized at a call site by default.
pub const DEFAULT_TRACKED: &[&str] = &["l", "l3", "l4", "l5", "l6", "at", "locate"];

/// Which calls on a line count as lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalleeFilter {
    /// Calls whose last path segment is one of these names.
    Tracked(Vec<String>),
    /// Any call; used when the key is passed through helper layers.
    Any,
}

impl Default for CalleeFilter {
    fn default() -> Self {
        Self::Tracked(DEFAULT_TRACKED.iter().map(|s| s.to_string()).collect())
    }
}

/// A test-table entry reached from a call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub key: Option<String>,
    pub position: SourcePosition,
}

/// A tracked call and the entries its argument ranges over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub position: SourcePosition,
    pub callee: String,
    pub argument: String,
    /// Why the argument could not be traced, when it could not.
    pub unresolved: Option<Unresolved>,
    pub entries: Vec<EntryInfo>,
}

pub struct Locator {
    callees: CalleeFilter,
}

impl Locator {
    pub fn new() -> Self {
        Self {
            callees: CalleeFilter::default(),
        }
    }

    pub fn builder() -> LocatorBuilder {
        LocatorBuilder::new()
    }

    pub fn callees(&self) -> &CalleeFilter {
        &self.callees
    }

    /// Position of the entry whose key is `key`, for the lookup call on
    /// `line` of the file at `path`.
    pub fn locate_file(
        &self,
        path: impl AsRef<Path>,
        line: usize,
        key: &str,
    ) -> Result<Option<SourcePosition>> {
        let path = path.as_ref();
        let parsed = parser::parse_file(path, &path.display().to_string())?;
        Ok(self.locate_parsed(&parsed, line, key))
    }

    pub fn locate_source(
        &self,
        name: &str,
        source: impl Into<String>,
        line: usize,
        key: &str,
    ) -> Result<Option<SourcePosition>> {
        let parsed = parser::parse_source(name, source)?;
        Ok(self.locate_parsed(&parsed, line, key))
    }

    fn locate_parsed(&self, parsed: &ParsedSource, line: usize, key: &str) -> Option<SourcePosition> {
        let ctx = Context::new(&parsed.tree, parsed.source.as_bytes(), parsed.path.clone());
        let index = BindingIndex::build(&ctx);
        let matcher = SiteMatcher::new(&ctx, &index, &self.callees);

        match matcher.locate(line, key) {
            Ok(entry) => Some(ctx.position(&entry)),
            Err(reason) => {
                debug!("no entry for {:?} at {}:{}: {}", key, parsed.path, line, reason);
                None
            }
        }
    }

    /// Every entry reachable from the lookup call on `line`.
    pub fn entries_at(&self, path: impl AsRef<Path>, line: usize) -> Result<Vec<EntryInfo>> {
        let path = path.as_ref();
        let parsed = parser::parse_file(path, &path.display().to_string())?;
        let ctx = Context::new(&parsed.tree, parsed.source.as_bytes(), parsed.path.clone());
        let index = BindingIndex::build(&ctx);
        let matcher = SiteMatcher::new(&ctx, &index, &self.callees);

        for call in matcher.calls_at(line) {
            let site = self.call_site(&matcher, &ctx, call);
            if site.unresolved.is_none() {
                return Ok(site.entries);
            }
        }
        Ok(Vec::new())
    }

    /// Every tracked call site in a file, with the entries each one reaches.
    pub fn call_sites(&self, path: &Path, display_path: &str) -> Result<Vec<CallSite>> {
        let parsed = parser::parse_file(path, display_path)?;
        let ctx = Context::new(&parsed.tree, parsed.source.as_bytes(), parsed.path.clone());
        let index = BindingIndex::build(&ctx);
        let matcher = SiteMatcher::new(&ctx, &index, &self.callees);

        Ok(matcher
            .all_calls()
            .into_iter()
            .map(|call| self.call_site(&matcher, &ctx, call))
            .collect())
    }

    fn call_site<'t>(
        &self,
        matcher: &SiteMatcher<'_, 't>,
        ctx: &Context<'t>,
        call: tree_sitter::Node<'t>,
    ) -> CallSite {
        let callee = call
            .child_by_field_name("function")
            .and_then(|f| matcher.callee_name(f))
            .unwrap_or_default();
        let args = call
            .child_by_field_name("arguments")
            .map(|a| ctx.elements(&a))
            .unwrap_or_default();

        let mut site = CallSite {
            position: ctx.position(&call),
            callee,
            argument: args.first().map(|a| ctx.get_node_text(a)).unwrap_or_default(),
            unresolved: Some(Unresolved::UnsupportedArgument),
            entries: Vec::new(),
        };

        for arg in args {
            match matcher.trace_argument(arg) {
                Ok(target) => {
                    site.argument = ctx.get_node_text(&arg);
                    site.unresolved = None;
                    site.entries = matcher
                        .entries(&target)
                        .into_iter()
                        .map(|entry| EntryInfo {
                            key: entry.key,
                            position: ctx.position(&entry.node),
                        })
                        .collect();
                    break;
                }
                Err(reason) => site.unresolved = Some(reason),
            }
            if matches!(self.callees, CalleeFilter::Tracked(_)) {
                break;
            }
        }
        site
    }
}

impl Default for Locator {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LocatorBuilder {
    tracked: Vec<String>,
    any_callee: bool,
    include_defaults: bool,
}

impl LocatorBuilder {
    pub fn new() -> Self {
        Self {
            tracked: Vec::new(),
            any_callee: false,
            include_defaults: true,
        }
    }

    /// Registers another lookup function name.
    pub fn track(mut self, name: impl Into<String>) -> Self {
        self.tracked.push(name.into());
        self
    }

    pub fn any_callee(mut self, any: bool) -> Self {
        self.any_callee = any;
        self
    }

    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    pub fn build(self) -> Locator {
        if self.any_callee {
            return Locator {
                callees: CalleeFilter::Any,
            };
        }

        let mut names = Vec::new();
        if self.include_defaults {
            names.extend(DEFAULT_TRACKED.iter().map(|s| s.to_string()));
        }
        for name in self.tracked {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Locator {
            callees: CalleeFilter::Tracked(names),
        }
    }
}

impl Default for LocatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
