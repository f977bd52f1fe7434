//! Bookkeeping for which tables may still be written to.
//!
//! TOML forbids declaring a table twice, reaching into inline tables and
//! static arrays, and reopening tables created by dotted keys from a later
//! section. [`Flags`] remembers those facts per key path, and
//! [`get_or_create_nest`]/[`append_nest_to_list`] walk the value tree.

use std::collections::{HashMap, HashSet};

use crate::value::{Table, Value};

/// A property of a key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Flag {
    /// Inline table or static array: nothing may be added below it.
    Frozen,
    /// Explicitly created: cannot be opened again with `[table]`.
    ExplicitNest,
}

#[derive(Debug, Default)]
struct FlagNode {
    flags: HashSet<Flag>,
    recursive_flags: HashSet<Flag>,
    nested: HashMap<String, FlagNode>,
}

/// Flags per key path, plus flags that only apply once the current section ends.
#[derive(Debug, Default)]
pub(crate) struct Flags {
    root: HashMap<String, FlagNode>,
    pending: Vec<(Vec<String>, Flag)>,
}

impl Flags {
    pub fn add_pending(&mut self, key: &[String], flag: Flag) {
        self.pending.push((key.to_vec(), flag));
    }

    pub fn finalize_pending(&mut self) {
        for (key, flag) in std::mem::take(&mut self.pending) {
            self.set(&key, flag, false);
        }
    }

    /// Forget everything known about `key` and below.
    pub fn unset_all(&mut self, key: &[String]) {
        let Some((stem, parent)) = key.split_last() else {
            return;
        };
        let mut cont = &mut self.root;
        for k in parent {
            match cont.get_mut(k) {
                Some(node) => cont = &mut node.nested,
                None => return,
            }
        }
        cont.remove(stem);
    }

    pub fn set(&mut self, key: &[String], flag: Flag, recursive: bool) {
        let Some((stem, parent)) = key.split_last() else {
            return;
        };
        let mut cont = &mut self.root;
        for k in parent {
            cont = &mut cont.entry(k.clone()).or_default().nested;
        }
        let node = cont.entry(stem.clone()).or_default();
        if recursive {
            node.recursive_flags.insert(flag);
        } else {
            node.flags.insert(flag);
        }
    }

    /// Whether `key` carries `flag`, directly or through a recursive flag
    /// on one of its parents. The document root has no flags.
    pub fn is(&self, key: &[String], flag: Flag) -> bool {
        let Some((stem, parent)) = key.split_last() else {
            return false;
        };
        let mut cont = &self.root;
        for k in parent {
            let Some(node) = cont.get(k) else {
                return false;
            };
            if node.recursive_flags.contains(&flag) {
                return true;
            }
            cont = &node.nested;
        }
        cont.get(stem)
            .is_some_and(|node| node.flags.contains(&flag) || node.recursive_flags.contains(&flag))
    }
}

/// A path leads through a value that is not a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotATable;

/// Walk `key` from `root`, creating empty tables on the way.
///
/// With `access_lists`, an array of tables along the path stands for its
/// last element.
pub(crate) fn get_or_create_nest<'t>(
    root: &'t mut Table,
    key: &[String],
    access_lists: bool,
) -> Result<&'t mut Table, NotATable> {
    let mut cont = root;
    for k in key {
        let mut value = cont
            .entry(k.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        if access_lists && let Value::Array(items) = value {
            value = items.last_mut().ok_or(NotATable)?;
        }
        cont = match value {
            Value::Table(table) => table,
            _ => return Err(NotATable),
        };
    }
    Ok(cont)
}

/// Add a new empty table to the array of tables at `key`.
pub(crate) fn append_nest_to_list(root: &mut Table, key: &[String]) -> Result<(), NotATable> {
    let Some((last, parent)) = key.split_last() else {
        return Err(NotATable);
    };
    let cont = get_or_create_nest(root, parent, true)?;
    match cont.get_mut(last) {
        Some(Value::Array(items)) => items.push(Value::Table(Table::new())),
        Some(_) => return Err(NotATable),
        None => {
            cont.insert(last.clone(), Value::Array(vec![Value::Table(Table::new())]));
        }
    }
    Ok(())
}
