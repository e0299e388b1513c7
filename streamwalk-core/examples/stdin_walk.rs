use streamwalk_core::{walk_nodes, ReaderSource};

fn main() {
    let source = ReaderSource::with_capacity(std::io::stdin().lock(), 512);
    for node in walk_nodes(source) {
        let node = node.unwrap();
        let indent = "  ".repeat(node.depth);
        match node.text() {
            Some(text) => println!("{}{:?}", indent, text),
            None => println!("{}{}", indent, node.node_name()),
        }
    }
}
