//! Nearest common native ancestor over two parent-pointer chains.
//!
//! A virtual parent/child link does not always map to a single native
//! parent/child link: containers may interpose wrapper objects. Reordering
//! must therefore act on the two ancestors that actually share a native
//! parent, not on the objects the diffing algorithm names.

use smallvec::SmallVec;

type Chain<O> = SmallVec<[O; 8]>;

/// Two objects that are direct native siblings under `parent`.
/// `parent` is `None` when both are top-level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingPair<O> {
    pub parent: Option<O>,
    pub child: O,
    pub before: O,
}

/// One object contains the other, so they can never be siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestedObjects<O> {
    pub child: O,
    pub before: O,
}

fn chain<O: Clone>(start: &O, parent_of: &impl Fn(&O) -> Option<O>) -> Chain<O> {
    let mut out = Chain::new();
    out.push(start.clone());
    let mut current = start.clone();
    while let Some(parent) = parent_of(&current) {
        out.push(parent.clone());
        current = parent;
    }
    out
}

/// Walk up from `child` and `before` until an ancestor pair sharing the same
/// native parent is found.
///
/// When both chains have the same depth below that parent this is the
/// lockstep walk; unequal depths (a wrapper on one side only) are handled by
/// meeting at the nearest common ancestor instead.
pub fn sibling_pair<O, F>(
    child: &O,
    before: &O,
    parent_of: F,
) -> Result<SiblingPair<O>, NestedObjects<O>>
where
    O: Clone + PartialEq,
    F: Fn(&O) -> Option<O>,
{
    let child_chain = chain(child, &parent_of);
    let before_chain = chain(before, &parent_of);

    if child_chain.contains(before) || before_chain.contains(child) {
        return Err(NestedObjects {
            child: child.clone(),
            before: before.clone(),
        });
    }

    // First ancestor of `before` that also encloses `child`.
    for (depth, ancestor) in before_chain.iter().enumerate().skip(1) {
        if let Some(pos) = child_chain.iter().position(|o| o == ancestor) {
            return Ok(SiblingPair {
                parent: Some(ancestor.clone()),
                child: child_chain[pos - 1].clone(),
                before: before_chain[depth - 1].clone(),
            });
        }
    }

    // Separate roots: siblings at the top level. Chains always hold their
    // starting object, so neither is empty.
    Ok(SiblingPair {
        parent: None,
        child: child_chain[child_chain.len() - 1].clone(),
        before: before_chain[before_chain.len() - 1].clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn tree(links: &[(u32, u32)]) -> impl Fn(&u32) -> Option<u32> {
        let parents: HashMap<u32, u32> = links.iter().copied().collect();
        move |id| parents.get(id).copied()
    }

    #[test]
    fn test_direct_siblings() {
        let parent_of = tree(&[(2, 1), (3, 1)]);
        let pair = sibling_pair(&2, &3, parent_of).unwrap();
        assert_eq!(
            pair,
            SiblingPair {
                parent: Some(1),
                child: 2,
                before: 3
            }
        );
    }

    #[test]
    fn test_wrapped_siblings_walk_in_lockstep() {
        // 1 -> wrapper 10 -> 2, 1 -> wrapper 11 -> 3
        let parent_of = tree(&[(10, 1), (11, 1), (2, 10), (3, 11)]);
        let pair = sibling_pair(&2, &3, parent_of).unwrap();
        assert_eq!(pair.parent, Some(1));
        assert_eq!((pair.child, pair.before), (10, 11));
    }

    #[test]
    fn test_unequal_depths() {
        // child sits two wrappers deep, before is a direct child
        let parent_of = tree(&[(20, 1), (21, 20), (2, 21), (3, 1)]);
        let pair = sibling_pair(&2, &3, parent_of).unwrap();
        assert_eq!(pair.parent, Some(1));
        assert_eq!((pair.child, pair.before), (20, 3));
    }

    #[test]
    fn test_top_level_pair() {
        let parent_of = tree(&[(2, 1)]);
        let pair = sibling_pair(&1, &5, parent_of).unwrap();
        assert_eq!(pair.parent, None);
        assert_eq!((pair.child, pair.before), (1, 5));
    }

    #[test]
    fn test_nested_objects_are_rejected() {
        let parent_of = tree(&[(2, 1), (3, 2)]);
        assert_eq!(
            sibling_pair(&3, &2, &parent_of),
            Err(NestedObjects { child: 3, before: 2 })
        );
        assert_eq!(
            sibling_pair(&2, &2, &parent_of),
            Err(NestedObjects { child: 2, before: 2 })
        );
    }
}
