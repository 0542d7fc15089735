//! Titles from the headings that precede an image.

use scraper::ElementRef;

use super::element_text;

/// Headings taken into account, innermost first.
const MAX_HEADING_LEVELS: usize = 3;

fn heading_rank(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// The image and each of its ancestors below `container`, innermost first.
///
/// Returns `None` when `image` is not inside `container`.
fn nesting_levels<'a>(image: ElementRef<'a>, container: ElementRef<'_>) -> Option<Vec<ElementRef<'a>>> {
    let mut levels = vec![image];
    let mut node = image;
    loop {
        let parent = node.parent()?;
        if parent.id() == container.id() {
            return Some(levels);
        }
        node = ElementRef::wrap(parent)?;
        levels.push(node);
    }
}

/// Builds a title for `image` from the section headings above it.
///
/// The image's own level is searched first, then the level of each wrapper
/// around it up to `container`. At every level preceding siblings are walked
/// backwards. The nearest heading is taken, then the nearest heading of a
/// strictly higher rank, and so on for at most three levels. Their text is
/// joined outermost first:
///
/// ```text
/// <h2>Apple</h2> <h3>Apple III</h3> <h4>Carousel</h4> <p><img></p>
///   => "Apple Apple III Carousel"
///
/// <h2>Apple</h2> <div class="wp-block-group"><h3>Apple III</h3> <figure><img></figure></div>
///   => "Apple Apple III"
/// ```
///
/// Returns `None` when no non-empty heading precedes the image.
pub fn heading_context(image: ElementRef<'_>, container: ElementRef<'_>) -> Option<String> {
    let levels = nesting_levels(image, container)?;
    let preceding = levels
        .iter()
        .flat_map(|node| node.prev_siblings())
        .filter_map(ElementRef::wrap);

    let mut headings = Vec::new();
    let mut current_rank = None;

    for sibling in preceding {
        let Some(rank) = heading_rank(sibling.value().name()) else {
            continue;
        };
        if current_rank.is_some_and(|current| rank >= current) {
            continue;
        }

        let text = element_text(sibling);
        if text.is_empty() {
            continue;
        }
        headings.push(text);
        current_rank = Some(rank);

        if headings.len() == MAX_HEADING_LEVELS || rank == 1 {
            break;
        }
    }

    if headings.is_empty() {
        return None;
    }
    headings.reverse();
    Some(headings.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn context_of_last_image(body: &str) -> Option<String> {
        let html = Html::parse_document(body);
        let container = html
            .select(&Selector::parse("div.entry-content").unwrap())
            .next()
            .unwrap();
        let image = container
            .select(&Selector::parse("img").unwrap())
            .last()
            .unwrap();
        heading_context(image, container)
    }

    #[test]
    fn test_three_nested_headings() {
        let body = r#"<div class="entry-content">
            <h2>Apple</h2>
            <h3>Apple III</h3>
            <h4>Carousel</h4>
            <p><a href="x.jpg"><img src="x.jpg"></a></p>
        </div>"#;
        assert_eq!(
            context_of_last_image(body).as_deref(),
            Some("Apple Apple III Carousel")
        );
    }

    #[test]
    fn test_sibling_headings_of_same_rank_skipped() {
        let body = r#"<div class="entry-content">
            <h2>Commodore</h2>
            <h3>VIC-20</h3>
            <p><img src="vic.jpg"></p>
            <h3>C64</h3>
            <p>Some text</p>
            <p><img src="c64.jpg"></p>
        </div>"#;
        assert_eq!(context_of_last_image(body).as_deref(), Some("Commodore C64"));
    }

    #[test]
    fn test_at_most_three_levels() {
        let body = r#"<div class="entry-content">
            <h1>Computers</h1>
            <h2>Apple</h2>
            <h3>Apple III</h3>
            <h4>Carousel</h4>
            <p><img src="x.jpg"></p>
        </div>"#;
        assert_eq!(
            context_of_last_image(body).as_deref(),
            Some("Apple Apple III Carousel")
        );
    }

    #[test]
    fn test_empty_headings_ignored() {
        let body = r#"<div class="entry-content">
            <h2>Atari</h2>
            <h3> </h3>
            <figure><img src="x.jpg"></figure>
        </div>"#;
        assert_eq!(context_of_last_image(body).as_deref(), Some("Atari"));
    }

    #[test]
    fn test_headings_inside_wrapper_block() {
        let body = r#"<div class="entry-content">
            <h2>Apple</h2>
            <div class="wp-block-group">
                <h3>Apple III</h3>
                <figure><img src="x.jpg"></figure>
            </div>
        </div>"#;
        assert_eq!(context_of_last_image(body).as_deref(), Some("Apple Apple III"));
    }

    #[test]
    fn test_wrapper_heading_of_lower_rank_skipped() {
        let body = r#"<div class="entry-content">
            <h3>Apple III</h3>
            <div class="wp-block-group">
                <h2>Apple</h2>
                <p>Intro</p>
                <h4>Keyboard</h4>
                <figure><img src="x.jpg"></figure>
            </div>
        </div>"#;
        // Keyboard (h4), then Apple (h2); the outer h3 is not higher than h2.
        assert_eq!(context_of_last_image(body).as_deref(), Some("Apple Keyboard"));
    }

    #[test]
    fn test_image_outside_container() {
        let html = Html::parse_document(
            r#"<h2>Header</h2><img src="a.jpg"><div class="entry-content"></div>"#,
        );
        let container = html
            .select(&Selector::parse("div.entry-content").unwrap())
            .next()
            .unwrap();
        let image = html.select(&Selector::parse("img").unwrap()).next().unwrap();
        assert_eq!(heading_context(image, container), None);
    }

    #[test]
    fn test_no_headings() {
        let body = r#"<div class="entry-content"><p><img src="x.jpg"></p></div>"#;
        assert_eq!(context_of_last_image(body), None);
    }

    #[test]
    fn test_headings_after_image_ignored() {
        let body = r#"<div class="entry-content">
            <p><img src="x.jpg"></p>
            <h2>Later section</h2>
        </div>"#;
        assert_eq!(context_of_last_image(body), None);
    }
}
