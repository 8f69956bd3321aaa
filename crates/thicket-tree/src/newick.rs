//! Newick rendering of time trees.
//!
//! Leaves are labelled with their taxon (falling back to the node index);
//! every non-root node carries its branch length, `parent.age - age`.
//! Labels holding Newick punctuation or whitespace are single-quoted, with
//! embedded quotes doubled.

use std::fmt::{self, Write};

use crate::node::NodeIndex;
use crate::tree::TimeTree;

impl TimeTree {
    /// Render the tree in Newick format, terminated by `;`.
    pub fn to_newick(&self) -> String {
        self.to_string()
    }

    fn write_subtree<W: Write>(&self, out: &mut W, index: NodeIndex) -> fmt::Result {
        let Some(node) = self.node(index) else {
            return Ok(());
        };
        if node.is_leaf() {
            match node.taxon() {
                Some(taxon) => write_label(out, taxon)?,
                None => write!(out, "{index}")?,
            }
        } else {
            out.write_char('(')?;
            for (i, &child) in node.children().iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                self.write_subtree(out, child)?;
            }
            out.write_char(')')?;
        }
        if let Some(parent) = node.parent().and_then(|p| self.node(p)) {
            write!(out, ":{}", parent.age() - node.age())?;
        }
        Ok(())
    }
}

fn needs_quotes(label: &str) -> bool {
    label.is_empty()
        || label
            .chars()
            .any(|c| c.is_whitespace() || "()[]',:;".contains(c))
}

fn write_label<W: Write>(out: &mut W, label: &str) -> fmt::Result {
    if !needs_quotes(label) {
        return out.write_str(label);
    }
    write!(out, "'{}'", label.replace('\'', "''"))
}

impl fmt::Display for TimeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(root) = self.root() {
            self.write_subtree(f, root)?;
        }
        f.write_char(';')
    }
}

#[cfg(test)]
mod tests {
    use crate::{NodeIndex, TimeTree};

    #[test]
    fn renders_branch_lengths() {
        let mut tree = TimeTree::from_leaves([("A", 0.0), ("B", 0.5), ("C", 0.0)]).unwrap();
        let ab = tree.add_internal(1.0, NodeIndex(0), NodeIndex(1)).unwrap();
        let root = tree.add_internal(3.0, ab, NodeIndex(2)).unwrap();
        tree.set_root(root).unwrap();
        assert_eq!(tree.to_newick(), "((A:1,B:0.5):2,C:3);");
    }

    #[test]
    fn punctuated_labels_are_quoted() {
        let mut tree =
            TimeTree::from_leaves([("Homo sapiens", 0.0), ("O'Brien", 0.0), ("a:b", 0.0)])
                .unwrap();
        let ab = tree.add_internal(1.0, NodeIndex(0), NodeIndex(1)).unwrap();
        let root = tree.add_internal(2.0, ab, NodeIndex(2)).unwrap();
        tree.set_root(root).unwrap();
        assert_eq!(
            tree.to_newick(),
            "(('Homo sapiens':1,'O''Brien':1):1,'a:b':2);"
        );
    }

    #[test]
    fn rootless_tree_is_empty_statement() {
        assert_eq!(TimeTree::new().to_newick(), ";");
    }
}
