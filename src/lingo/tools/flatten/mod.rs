//! Dotted key-path encoding of trees.
//!
//! [`flatten`] walks mapping nodes depth first and records every leaf under the
//! path of mapping keys that leads to it. [`unflatten`] reads such paths back
//! and rebuilds the nested mappings. Sequences are never indexed into: they are
//! leaves like scalars.

use tracing::warn;

use crate::lingo::tools::error::{Result, ToolError};
use crate::lingo::tools::model::{FlatMap, Mapping, TreeValue};

/// Separator placed between path segments.
pub const DEFAULT_SEPARATOR: char = '.';

/// What to do with a mapping key that itself contains the separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorPolicy {
    /// Fail with [`ToolError::SeparatorInKey`].
    #[default]
    Reject,
    /// Keep the key as is. The resulting path cannot be told apart from a
    /// deeper path unless the reader limits the split depth.
    Allow,
}

/// What to do when two key paths disagree about the shape of the tree, e.g.
/// `a` holds a value and `a.b` needs `a` to be a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The later path wins and replaces whatever was stored before.
    #[default]
    Overwrite,
    /// Fail with [`ToolError::StructuralConflict`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenOptions {
    pub separator: char,
    pub separator_in_keys: SeparatorPolicy,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            separator_in_keys: SeparatorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnflattenOptions {
    pub separator: char,
    /// Maximum number of times a key is split. Everything after the last
    /// allowed separator stays together as the leaf key. `None` splits on
    /// every separator.
    pub max_depth: Option<usize>,
    pub on_conflict: ConflictPolicy,
}

impl Default for UnflattenOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            max_depth: None,
            on_conflict: ConflictPolicy::default(),
        }
    }
}

/// Flattens a tree with the default options.
pub fn flatten(value: &TreeValue) -> Result<FlatMap> {
    flatten_with(value, &FlattenOptions::default())
}

/// Flattens a tree into key path → leaf entries, in the tree's key order.
///
/// An empty mapping or `null` document yields an empty map. Any other
/// non-mapping root has no key to live under and fails with
/// [`ToolError::EmptyKeyPath`], as does an empty top-level key. Nested empty
/// mappings are kept as leaves so they survive a round trip.
pub fn flatten_with(value: &TreeValue, options: &FlattenOptions) -> Result<FlatMap> {
    let mut output = FlatMap::new();
    if value.is_empty_document() {
        return Ok(output);
    }

    let entries = value.as_mapping().ok_or(ToolError::EmptyKeyPath)?;
    flatten_mapping(entries, None, options, &mut output)?;
    Ok(output)
}

fn flatten_mapping(
    entries: &Mapping,
    prefix: Option<&str>,
    options: &FlattenOptions,
    output: &mut FlatMap,
) -> Result<()> {
    for (key, value) in entries {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{}{key}", options.separator),
            None => key.clone(),
        };
        if path.is_empty() {
            return Err(ToolError::EmptyKeyPath);
        }

        if key.contains(options.separator) && options.separator_in_keys == SeparatorPolicy::Reject
        {
            return Err(ToolError::SeparatorInKey {
                path,
                separator: options.separator,
            });
        }

        match value {
            TreeValue::Mapping(children) if !children.is_empty() => {
                flatten_mapping(children, Some(&path), options, output)?;
            }
            leaf => {
                if output.insert(path.clone(), leaf.clone()).is_some() {
                    warn!(%path, "flattened path produced twice; keeping the later value");
                }
            }
        }
    }

    Ok(())
}

/// Rebuilds a tree with the default options.
pub fn unflatten(map: &FlatMap) -> Result<TreeValue> {
    unflatten_with(map, &UnflattenOptions::default())
}

/// Rebuilds nested mappings from key paths, visiting entries in map order.
///
/// The result is always a mapping, even for an empty input.
pub fn unflatten_with(map: &FlatMap, options: &UnflattenOptions) -> Result<TreeValue> {
    let mut root = Mapping::new();
    for (key, value) in map {
        insert_path(&mut root, key, value.clone(), options)?;
    }
    Ok(TreeValue::Mapping(root))
}

/// Splits a key path into segments according to the depth limit.
pub fn split_key<'a>(key: &'a str, options: &UnflattenOptions) -> Vec<&'a str> {
    match options.max_depth {
        Some(depth) => key.splitn(depth + 1, options.separator).collect(),
        None => key.split(options.separator).collect(),
    }
}

fn insert_path(
    root: &mut Mapping,
    key: &str,
    value: TreeValue,
    options: &UnflattenOptions,
) -> Result<()> {
    let segments = split_key(key, options);
    let Some((leaf, parents)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(TreeValue::empty);
        let conflict_path = || join(&parents[..=depth], options.separator);
        current = descend(slot, key, conflict_path, options)?;
    }

    if let Some(TreeValue::Mapping(children)) = current.get(*leaf) {
        if !children.is_empty() {
            match options.on_conflict {
                ConflictPolicy::Reject => {
                    return Err(ToolError::StructuralConflict {
                        key: key.to_string(),
                        path: join(&segments, options.separator),
                    });
                }
                ConflictPolicy::Overwrite => {
                    warn!(key, "leaf replaces a nested mapping");
                }
            }
        }
    }

    current.insert((*leaf).to_string(), value);
    Ok(())
}

fn descend<'a>(
    slot: &'a mut TreeValue,
    key: &str,
    conflict_path: impl Fn() -> String,
    options: &UnflattenOptions,
) -> Result<&'a mut Mapping> {
    if !matches!(slot, TreeValue::Mapping(_)) {
        match options.on_conflict {
            ConflictPolicy::Reject => {
                return Err(ToolError::StructuralConflict {
                    key: key.to_string(),
                    path: conflict_path(),
                });
            }
            ConflictPolicy::Overwrite => {
                warn!(key, path = %conflict_path(), "nested key replaces a leaf value");
                *slot = TreeValue::empty();
            }
        }
    }

    match slot {
        TreeValue::Mapping(children) => Ok(children),
        _ => Err(ToolError::StructuralConflict {
            key: key.to_string(),
            path: conflict_path(),
        }),
    }
}

fn join(segments: &[&str], separator: char) -> String {
    segments.join(separator.to_string().as_str())
}
