//! Small element predicates and text accessors shared by site processors

use scraper::ElementRef;

pub fn is_tag(node: ElementRef<'_>, name: &str) -> bool {
    node.value().name() == name
}

pub fn is_anchor(node: ElementRef<'_>) -> bool {
    is_tag(node, "a")
}

/// Substring match against the raw `class` attribute
pub fn class_contains(node: ElementRef<'_>, needle: &str) -> bool {
    node.value()
        .attr("class")
        .is_some_and(|class| class.contains(needle))
}

/// Exact match against the raw `class` attribute
pub fn class_equals(node: ElementRef<'_>, value: &str) -> bool {
    node.value().attr("class") == Some(value)
}

/// Non-empty `href` of the element
pub fn href(node: ElementRef<'_>) -> Option<&str> {
    node.value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

/// All descendant text, trimmed
pub fn text_of(node: ElementRef<'_>) -> String {
    node.text().collect::<String>().trim().to_string()
}

/// First non-blank text node directly under the element
pub fn own_text(node: ElementRef<'_>) -> Option<String> {
    node.children()
        .filter_map(|child| child.value().as_text().map(|t| t.trim().to_string()))
        .find(|t| !t.is_empty())
}

pub fn child_elements<'a>(node: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    node.children().filter_map(ElementRef::wrap)
}

pub fn first_child_element(node: ElementRef<'_>) -> Option<ElementRef<'_>> {
    child_elements(node).next()
}

/// First child element carrying the given tag name
pub fn child_by_tag<'a>(node: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    child_elements(node).find(|c| is_tag(*c, name))
}

/// First child element whose class contains `needle`
pub fn child_with_class<'a>(node: ElementRef<'a>, needle: &str) -> Option<ElementRef<'a>> {
    child_elements(node).find(|c| class_contains(*c, needle))
}

/// Following sibling whose class attribute is exactly `class`
pub fn next_sibling_with_class<'a>(node: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    node.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|s| class_equals(*s, class))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(document: &'a Html, selector: &str) -> ElementRef<'a> {
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next().unwrap()
    }

    #[test]
    fn test_class_and_href_helpers() {
        let document = Html::parse_fragment(
            r#"<a class="listing__link js-click" href=" /ingatlan/123 ">x</a><a href="">y</a>"#,
        );
        let link = first(&document, "a.listing__link");
        assert!(is_anchor(link));
        assert!(class_contains(link, "listing__link"));
        assert!(!class_equals(link, "listing__link"));
        assert_eq!(href(link), Some("/ingatlan/123"));

        let empty = first(&document, "a:not(.listing__link)");
        assert_eq!(href(empty), None);
    }

    #[test]
    fn test_own_text_skips_whitespace_and_children() {
        let document = Html::parse_fragment("<h1 class=\"address\">\n  <b>ignored</b> Budapest XI. <i>x</i></h1>");
        let h1 = first(&document, "h1");
        assert_eq!(own_text(h1).as_deref(), Some("Budapest XI."));
        assert_eq!(text_of(h1), "ignored Budapest XI. x");
    }

    #[test]
    fn test_sibling_lookup() {
        let document = Html::parse_fragment(
            r#"<div><div class="parameterTitle">Szobák</div><div class="other"></div><div class="parameterValues"><span>3</span></div></div>"#,
        );
        let title = first(&document, ".parameterTitle");
        let value = next_sibling_with_class(title, "parameterValues").unwrap();
        assert_eq!(text_of(child_by_tag(value, "span").unwrap()), "3");
    }
}
