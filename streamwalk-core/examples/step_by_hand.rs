use streamwalk_core::{IterSource, TreeWalker, WalkerConfig};

fn main() {
    let chunks = ["<html>", "<head />", "<body>", "<div class=\"foo\">Bar</div>", "</body>", "</html>"];

    for config in [WalkerConfig::sentinel(), WalkerConfig::heuristic()] {
        println!("{:?}", config.strategy);
        let mut walker = TreeWalker::with_config(IterSource::new(chunks), config).unwrap();

        let html = walker.root();
        let head = walker.first_child(html).unwrap();
        let body = walker.next_sibling(head).unwrap();
        let div = walker.first_child(body).unwrap();
        let text = walker.first_child(div).unwrap();

        println!("  settled after {} of {} chunks", walker.chunks_read(), chunks.len());
        for id in [html, head, body, div, text].into_iter().flatten() {
            let node = walker.node(id);
            match node.text() {
                Some(text) => println!("  {:?}", text),
                None => println!("  <{}>", node.node_name()),
            }
        }
    }
}
