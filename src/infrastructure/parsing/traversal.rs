//! Depth-first document walk
//!
//! Parent before children, siblings in document order. An explicit stack keeps
//! deeply nested markup from exhausting the thread stack.

use scraper::ElementRef;

use super::NodeProcessor;

/// Apply one processor to every element under (and including) `root`.
pub fn traverse<'a, P>(root: ElementRef<'a>, processor: &mut P)
where
    P: NodeProcessor + ?Sized,
{
    let mut stack: Vec<ElementRef<'a>> = vec![root];

    while let Some(element) = stack.pop() {
        if processor.matches(element) {
            processor.visit(element);
        }

        let children: Vec<ElementRef<'a>> = element.children().filter_map(ElementRef::wrap).collect();
        stack.extend(children.into_iter().rev());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    /// Records every element name it is shown, matching everything
    #[derive(Default)]
    struct Recorder {
        seen: Vec<String>,
    }

    impl NodeProcessor for Recorder {
        fn matches(&self, _node: ElementRef<'_>) -> bool {
            true
        }

        fn visit(&mut self, node: ElementRef<'_>) {
            let id = node.value().attr("id").unwrap_or(node.value().name());
            self.seen.push(id.to_string());
        }
    }

    /// Keeps the ids of the spans it visits
    #[derive(Default)]
    struct SpanRecorder {
        visited: Vec<String>,
    }

    impl NodeProcessor for SpanRecorder {
        fn matches(&self, node: ElementRef<'_>) -> bool {
            node.value().name() == "span"
        }

        fn visit(&mut self, node: ElementRef<'_>) {
            assert_eq!(node.value().name(), "span");
            self.visited.push(node.value().attr("id").unwrap_or_default().to_string());
        }
    }

    const NESTED: &str = r#"
        <html><body>
            <div id="a">
                <span id="a1"></span>
                <div id="a2"><span id="a2x"></span></div>
            </div>
            <div id="b"><span id="b1"></span></div>
        </body></html>
    "#;

    #[test]
    fn test_depth_first_parent_before_children() {
        let document = Html::parse_document(NESTED);
        let mut recorder = Recorder::default();
        traverse(document.root_element(), &mut recorder);

        assert_eq!(
            recorder.seen,
            vec!["html", "head", "body", "a", "a1", "a2", "a2x", "b", "b1"]
        );
    }

    #[test]
    fn test_visit_only_on_match() {
        let document = Html::parse_document(NESTED);
        let mut recorder = SpanRecorder::default();
        traverse(document.root_element(), &mut recorder);
        assert_eq!(recorder.visited, vec!["a1", "a2x", "b1"]);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 5_000;
        let html = format!("{}{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let document = Html::parse_document(&html);

        let mut recorder = Recorder::default();
        traverse(document.root_element(), &mut recorder);
        assert!(recorder.seen.len() > depth);
    }
}
