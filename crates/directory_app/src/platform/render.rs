//! Binds the view model to HTML markup. Every text field and attribute
//! value passes through [`escape_html`].

use std::fmt::Write;

use directory_core::{
    AppViewModel, Badge, Card, DebugView, Filter, GalleryView, ResultsView, Section,
    SectionLayout,
};

const FILTERS: [Filter; 4] = [Filter::All, Filter::Images, Filter::Websites, Filter::Videos];

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Only web and in-page links are emitted as `href`.
fn safe_href(link: &str) -> String {
    let lower = link.trim().to_ascii_lowercase();
    if lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with('/')
        || lower.starts_with('#')
    {
        escape_html(link.trim())
    } else {
        "#".to_string()
    }
}

fn filter_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All",
        Filter::Images => "Images",
        Filter::Websites => "Websites",
        Filter::Videos => "Videos",
    }
}

pub fn render_page(view: &AppViewModel) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Search results</title></head>\n");
    let body_class = if view.scroll_locked { " class=\"scroll-locked\"" } else { "" };
    let _ = writeln!(html, "<body{body_class}>");

    let _ = writeln!(
        html,
        "<form class=\"search-form\" action=\"\" method=\"get\"><input type=\"search\" name=\"q\" value=\"{}\"><button type=\"submit\">Search</button></form>",
        escape_html(&view.input)
    );

    html.push_str("<nav class=\"filters\">");
    for filter in FILTERS {
        let active = if filter == view.filter { " active" } else { "" };
        let _ = write!(
            html,
            "<button class=\"filter{active}\" data-filter=\"{}\">{}</button>",
            filter.as_str(),
            filter_label(filter)
        );
    }
    html.push_str("</nav>\n");

    if view.loading {
        html.push_str("<div class=\"loader\" aria-busy=\"true\">Searching...</div>\n");
    }
    html.push_str("<main id=\"results\">\n");
    html.push_str(&render_results(&view.results));
    html.push_str("</main>\n");

    if let Some(gallery) = &view.gallery {
        html.push_str(&render_gallery(gallery));
    }
    if let Some(debug) = &view.debug {
        html.push_str(&render_debug(debug));
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub fn render_results(results: &ResultsView) -> String {
    match results {
        ResultsView::Blank => String::new(),
        ResultsView::Prompt => {
            format!("<p class=\"message\">{}</p>\n", escape_html(directory_core::PROMPT_MESSAGE))
        }
        ResultsView::Error(message) => {
            format!("<p class=\"message error\">{}</p>\n", escape_html(message))
        }
        ResultsView::NoResults(filter) => format!(
            "<p class=\"no-results\">{}</p>\n",
            escape_html(filter.no_results_message())
        ),
        ResultsView::Sections(sections) => {
            let mut html = String::new();
            let mut gallery_index = 0;
            for section in sections {
                html.push_str(&render_section(section, gallery_index));
                gallery_index += section.cards.len();
            }
            html
        }
    }
}

/// `first_index` is the gallery position of the section's first card.
fn render_section(section: &Section, first_index: usize) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<section class=\"results-section {}\">\n<h2>{}</h2>",
        section.result_type.as_str(),
        escape_html(section.heading)
    );
    let container = match section.layout {
        SectionLayout::Grid => "image-grid",
        SectionLayout::List => "result-list",
    };
    let _ = writeln!(html, "<div class=\"{container}\">");
    for (offset, card) in section.cards.iter().enumerate() {
        let index = first_index + offset;
        match section.layout {
            SectionLayout::Grid => html.push_str(&render_grid_card(card, index)),
            SectionLayout::List => html.push_str(&render_list_card(card, index)),
        }
    }
    html.push_str("</div>\n</section>\n");
    html
}

fn render_image(card: &Card, class: &str, index: usize) -> String {
    format!(
        "<img class=\"{class}\" src=\"{}\" alt=\"{}\" data-gallery-index=\"{index}\" loading=\"lazy\" onerror=\"this.onerror=null;this.src='{}'\">",
        escape_html(&card.image_src),
        escape_html(&card.title),
        escape_html(card.fallback_src)
    )
}

fn render_grid_card(card: &Card, index: usize) -> String {
    format!(
        "<figure class=\"image-card\">{}<figcaption><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></figcaption></figure>\n",
        render_image(card, "grid-image", index),
        safe_href(&card.link),
        escape_html(&card.title)
    )
}

fn render_list_card(card: &Card, index: usize) -> String {
    let href = safe_href(&card.link);
    let badge = card.badge.as_ref().map(render_badge).unwrap_or_default();
    format!(
        "<article class=\"result-card {kind}\">{image}<div class=\"result-body\"><h3><a href=\"{href}\" target=\"_blank\" rel=\"noopener\">{title}</a></h3>{badge}<p>{description}</p><a class=\"action\" href=\"{href}\" target=\"_blank\" rel=\"noopener\">{action}</a></div></article>\n",
        kind = card.result_type.as_str(),
        image = render_image(card, "thumb", index),
        title = escape_html(&card.title),
        description = escape_html(&card.description),
        action = escape_html(card.action_label),
    )
}

fn render_badge(badge: &Badge) -> String {
    match badge {
        Badge::Company(name) | Badge::Owner(name) => format!(
            "<span class=\"badge badge-{}\">{}: {}</span>",
            badge.label().to_ascii_lowercase(),
            escape_html(badge.label()),
            escape_html(name)
        ),
        Badge::CompanyOnly => "<span class=\"badge badge-company\">Company</span>".to_string(),
        Badge::SiteType(site_type) => format!(
            "<span class=\"badge badge-type\">{}</span>",
            escape_html(site_type)
        ),
    }
}

pub fn render_gallery(gallery: &GalleryView) -> String {
    let state = if gallery.visible { "open" } else { "closing" };
    let item = &gallery.item;
    let mut meta = format!("<h3>{}</h3>", escape_html(&item.title));
    if !item.description.is_empty() {
        let _ = write!(meta, "<p>{}</p>", escape_html(&item.description));
    }
    if let Some(attribution) = &item.attribution {
        let _ = write!(meta, "<p class=\"attribution\">{}</p>", escape_html(attribution));
    }
    if let Some(link) = &item.link {
        let _ = write!(
            meta,
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open</a>",
            safe_href(link)
        );
    }
    let disabled = |enabled: bool| if enabled { "" } else { " disabled" };
    format!(
        "<div class=\"gallery-overlay {state}\" role=\"dialog\" aria-modal=\"true\">\
<button class=\"gallery-prev\"{prev}>&lsaquo;</button>\
<img src=\"{src}\" alt=\"{alt}\">\
<div class=\"gallery-meta\">{meta}</div>\
<span class=\"gallery-counter\">{position} / {total}</span>\
<button class=\"gallery-next\"{next}>&rsaquo;</button>\
<button class=\"gallery-close\">&times;</button></div>\n",
        prev = disabled(gallery.has_prev),
        next = disabled(gallery.has_next),
        src = escape_html(&item.src),
        alt = escape_html(&item.alt),
        position = gallery.index + 1,
        total = gallery.total,
    )
}

fn render_debug(debug: &DebugView) -> String {
    format!(
        "<pre class=\"debug-panel\">token={} query={} searching={} results={} filter={}</pre>\n",
        debug.token,
        escape_html(&debug.last_query),
        debug.is_searching,
        debug.result_count,
        debug.filter
    )
}

/// Plain-text rendition for the interactive terminal session.
pub fn render_summary(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "filter: {}  query: {:?}", view.filter, view.input);
    if view.loading {
        out.push_str("searching...\n");
    }
    match &view.results {
        ResultsView::Blank => {}
        ResultsView::Prompt => {
            let _ = writeln!(out, "{}", directory_core::PROMPT_MESSAGE);
        }
        ResultsView::Error(message) => {
            let _ = writeln!(out, "{message}");
        }
        ResultsView::NoResults(filter) => {
            let _ = writeln!(out, "{}", filter.no_results_message());
        }
        ResultsView::Sections(sections) => {
            let mut index = 0;
            for section in sections {
                let _ = writeln!(out, "{} ({})", section.heading, section.cards.len());
                for card in &section.cards {
                    let badge = card
                        .badge
                        .as_ref()
                        .map(|badge| match badge.company_name() {
                            Some(name) => format!(" [{}: {}]", badge.label(), name),
                            None => format!(" [{}]", badge.label()),
                        })
                        .unwrap_or_default();
                    let _ = writeln!(out, "  [{index}] {}{badge}  {}", card.title, card.link);
                    index += 1;
                }
            }
        }
    }
    if let Some(gallery) = &view.gallery {
        let _ = writeln!(
            out,
            "gallery {}/{}{}: {}  {}",
            gallery.index + 1,
            gallery.total,
            if gallery.visible { "" } else { " (closing)" },
            gallery.item.title,
            gallery.item.src
        );
    }
    if let Some(debug) = &view.debug {
        let _ = writeln!(
            out,
            "debug: token={} query={:?} searching={} results={} filter={}",
            debug.token, debug.last_query, debug.is_searching, debug.result_count, debug.filter
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_core::{render, NormalizedResult, ResultType};
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn injected_titles_are_inert() {
        let result = NormalizedResult::new("<script>alert(1)</script>", ResultType::Website)
            .with_url("javascript:alert(1)")
            .with_company("<i>Acme</i>", true);
        let view = render(&[result], Filter::All, false).unwrap();
        let html = render_results(&view);

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("javascript:"));
        assert!(html.contains("Company: &lt;i&gt;Acme&lt;/i&gt;"));
    }

    #[test]
    fn every_image_carries_a_fallback() {
        let results: Vec<_> = (0..3)
            .map(|i| NormalizedResult::new(format!("img{i}"), ResultType::Image))
            .collect();
        let view = render(&results, Filter::Images, false).unwrap();
        let html = render_results(&view);
        assert_eq!(html.matches("onerror=").count(), 3);
        assert!(html.contains("data-gallery-index=\"2\""));
    }

    #[test]
    fn grid_captions_link_to_the_image_page() {
        let results = vec![
            NormalizedResult::new("Sunset", ResultType::Image)
                .with_url("https://photos.example/sunset?a=1&b=2"),
            NormalizedResult::new("Bare", ResultType::Image),
        ];
        let view = render(&results, Filter::Images, false).unwrap();
        let html = render_results(&view);
        assert!(html.contains(
            "<figcaption><a href=\"https://photos.example/sunset?a=1&amp;b=2\" target=\"_blank\" rel=\"noopener\">Sunset</a></figcaption>"
        ));
        assert!(html.contains("<figcaption><a href=\"#\" target=\"_blank\" rel=\"noopener\">Bare</a></figcaption>"));
    }

    #[test]
    fn gallery_indices_continue_across_sections() {
        let results = vec![
            NormalizedResult::new("pic", ResultType::Image),
            NormalizedResult::new("clip", ResultType::Video),
        ];
        let view = render(&results, Filter::All, false).unwrap();
        let html = render_results(&view);
        assert!(html.contains("alt=\"clip\" data-gallery-index=\"1\""));
    }
}
