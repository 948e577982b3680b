//! Terminal rendering of a parsed file list.

use std::collections::BTreeMap;

#[derive(Default)]
struct Node {
    dirs: BTreeMap<String, Node>,
    files: Vec<String>,
}

/// Render a parsed path list as a box-drawing tree.
///
/// Directories sort first, then files, both alphabetically. Duplicate paths
/// collapse into one entry here; this is display only and does not feed back
/// into selection state.
pub fn render_tree(paths: &[String]) -> String {
    let mut root = Node::default();
    for path in paths {
        let mut node = &mut root;
        let mut parts = path.split('/').filter(|p| !p.is_empty()).peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                node = node.dirs.entry(part.to_string()).or_default();
            } else if !node.files.iter().any(|f| f == part) {
                node.files.push(part.to_string());
            }
        }
    }

    let mut lines = Vec::new();
    render_node(&root, "", &mut lines);
    lines.join("\n")
}

fn render_node(node: &Node, prefix: &str, lines: &mut Vec<String>) {
    let mut files = node.files.clone();
    files.sort();

    let total = node.dirs.len() + files.len();
    let mut idx = 0;

    for (name, child) in &node.dirs {
        idx += 1;
        let last = idx == total;
        let connector = if last { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{name}/"));
        let extension = if last { "    " } else { "│   " };
        render_node(child, &format!("{prefix}{extension}"), lines);
    }

    for name in &files {
        idx += 1;
        let connector = if idx == total { "└── " } else { "├── " };
        lines.push(format!("{prefix}{connector}{name}"));
    }
}
