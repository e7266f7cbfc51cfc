//! Materialized paths for the page hierarchy.
//!
//! Every page stores the ids of its ancestors and itself as `/<root>/…/<id>/`.
//! Ids are UUIDv7 so sorting a course's pages by path gives a pre-order walk
//! with siblings in creation order.

use crate::ids::PageId;

const SEP: char = '/';

/// Path of a page without a parent.
pub fn root_path(id: PageId) -> String {
    format!("{SEP}{id}{SEP}")
}

/// Path of `id` placed under a parent whose path is `parent_path`.
pub fn child_path(parent_path: &str, id: PageId) -> String {
    format!("{parent_path}{id}{SEP}")
}

/// Number of ancestors encoded in `path`. Roots are at depth 0.
pub fn depth(path: &str) -> i32 {
    segments(path).count().saturating_sub(1) as i32
}

/// Ancestor ids of the page at `path`, root first, excluding the page itself.
pub fn ancestor_ids(path: &str) -> Result<Vec<PageId>, uuid::Error> {
    let mut ids = segments(path)
        .map(PageId::parse_str)
        .collect::<Result<Vec<_>, _>>()?;
    ids.pop();
    Ok(ids)
}

/// True when `path` is `ancestor` itself or lies somewhere below it.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    path.starts_with(ancestor)
}

/// Move `path` from under `old_prefix` to under `new_prefix`.
pub fn rebase(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    match path.strip_prefix(old_prefix) {
        Some(rest) => format!("{new_prefix}{rest}"),
        None => path.to_owned(),
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEP).filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_paths() {
        let root = PageId::new();
        let child = PageId::new();
        let grandchild = PageId::new();

        let root_p = root_path(root);
        let child_p = child_path(&root_p, child);
        let grandchild_p = child_path(&child_p, grandchild);

        assert_eq!(root_p, format!("/{root}/"));
        assert_eq!(grandchild_p, format!("/{root}/{child}/{grandchild}/"));
        assert_eq!(depth(&root_p), 0);
        assert_eq!(depth(&child_p), 1);
        assert_eq!(depth(&grandchild_p), 2);
    }

    #[test]
    fn ancestors_are_root_first() {
        let root = PageId::new();
        let child = PageId::new();
        let leaf = PageId::new();
        let path = child_path(&child_path(&root_path(root), child), leaf);

        assert_eq!(ancestor_ids(&path).unwrap(), vec![root, child]);
        assert!(ancestor_ids(&root_path(root)).unwrap().is_empty());
    }

    #[test]
    fn within_covers_self_and_descendants_only() {
        let root = PageId::new();
        let child = PageId::new();
        let other = PageId::new();
        let root_p = root_path(root);
        let child_p = child_path(&root_p, child);

        assert!(is_within(&child_p, &root_p));
        assert!(is_within(&root_p, &root_p));
        assert!(!is_within(&root_p, &child_p));
        assert!(!is_within(&root_path(other), &root_p));
    }

    #[test]
    fn rebase_moves_subtree() {
        let a = PageId::new();
        let b = PageId::new();
        let c = PageId::new();
        let target = PageId::new();

        let old_prefix = child_path(&root_path(a), b);
        let descendant = child_path(&old_prefix, c);
        let new_prefix = child_path(&root_path(target), b);

        assert_eq!(
            rebase(&descendant, &old_prefix, &new_prefix),
            format!("/{target}/{b}/{c}/")
        );
        assert_eq!(rebase("/x/", &old_prefix, &new_prefix), "/x/");
    }

    #[test]
    fn malformed_path_is_an_error() {
        assert!(ancestor_ids("/not-a-uuid/also-bad/").is_err());
    }
}
