use directory_core::{
    render, Badge, Filter, NormalizedResult, ResultType, ResultsView, Schema, Section,
    SectionLayout, ALL_IMAGES_CAP, FALLBACK_IMAGE,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn result(title: &str, kind: ResultType) -> NormalizedResult {
    NormalizedResult::new(title, kind).with_url(format!("https://{title}.example"))
}

fn sections(view: Option<ResultsView>) -> Vec<Section> {
    match view {
        Some(ResultsView::Sections(sections)) => sections,
        other => panic!("expected sections, got {other:?}"),
    }
}

#[test]
fn cat_query_against_images_collection() {
    let schema = Schema::default();
    let records = [
        json!({ "title": "Cat pics", "keywords": ["cat", "feline"] }),
        json!({ "title": "Dog" }),
    ];
    let results: Vec<_> = records
        .iter()
        .filter(|record| schema.matches(record, "cat"))
        .map(|record| schema.normalize("images", record, "https://dir.example"))
        .collect();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].result_type, ResultType::Image);
    assert_eq!(results[0].title, "Cat pics");
}

#[test]
fn all_filter_caps_image_grid_at_nine() {
    let results: Vec<_> = (0..10)
        .map(|i| result(&format!("img{i}"), ResultType::Image))
        .collect();
    let sections = sections(render(&results, Filter::All, false));

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].layout, SectionLayout::Grid);
    assert_eq!(sections[0].cards.len(), ALL_IMAGES_CAP);
    assert_eq!(sections[0].cards[8].title, "img8");
}

#[test]
fn images_filter_is_uncapped() {
    let results: Vec<_> = (0..12)
        .map(|i| result(&format!("img{i}"), ResultType::Image))
        .collect();
    let sections = sections(render(&results, Filter::Images, false));
    assert_eq!(sections[0].cards.len(), 12);
}

#[test]
fn all_filter_orders_sections_and_omits_empty_ones() {
    let results = vec![
        result("site", ResultType::Website),
        result("clip", ResultType::Video),
        result("pic", ResultType::Image),
        result("site2", ResultType::Website),
    ];
    let sections = sections(render(&results, Filter::All, false));
    let headings: Vec<_> = sections.iter().map(|s| s.heading).collect();
    assert_eq!(headings, vec!["Images", "Videos", "Websites"]);
    assert_eq!(sections[2].cards.len(), 2);

    let only_sites = vec![result("site", ResultType::Website)];
    let sections = self::sections(render(&only_sites, Filter::All, false));
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].heading, "Websites");
}

#[test]
fn empty_results_render_nothing_while_searching() {
    assert_eq!(render(&[], Filter::All, true), None);
    assert_eq!(
        render(&[], Filter::Videos, false),
        Some(ResultsView::NoResults(Filter::Videos))
    );
    assert_eq!(
        Filter::Videos.no_results_message(),
        "No videos found for your search"
    );
}

#[test]
fn empty_partition_is_scoped_to_filter() {
    let results = vec![result("site", ResultType::Website)];
    assert_eq!(
        render(&results, Filter::Images, false),
        Some(ResultsView::NoResults(Filter::Images))
    );
    assert_eq!(render(&results, Filter::Images, true), None);
    // The "all" layout waits for images while a search is still in flight.
    assert_eq!(render(&results, Filter::All, true), None);
}

#[test]
fn cards_substitute_placeholders() {
    let bare = NormalizedResult::new("", ResultType::Video);
    let sections = sections(render(&[bare], Filter::All, false));
    let card = &sections[0].cards[0];
    assert_eq!(card.title, "Untitled");
    assert_eq!(card.link, "#");
    assert_eq!(card.image_src, FALLBACK_IMAGE);
    assert_eq!(card.fallback_src, FALLBACK_IMAGE);
    assert_eq!(card.action_label, "View Video");
}

#[test]
fn badge_precedence() {
    let company = result("a", ResultType::Website)
        .with_company("Acme", true)
        .with_site_type("Blog");
    let owner = result("b", ResultType::Website).with_company("Jane", false);
    let flag_only = result("c", ResultType::Website).with_company("  ", true);
    let typed = result("d", ResultType::Website).with_site_type("Portfolio");
    let plain = result("e", ResultType::Website);

    assert_eq!(Badge::for_result(&company), Some(Badge::Company("Acme".into())));
    assert_eq!(Badge::for_result(&owner).unwrap().label(), "Owner");
    assert_eq!(Badge::for_result(&flag_only), Some(Badge::CompanyOnly));
    assert_eq!(
        Badge::for_result(&typed),
        Some(Badge::SiteType("Portfolio".into()))
    );
    assert_eq!(Badge::for_result(&plain), None);
}

#[test]
fn gallery_items_follow_display_order() {
    let results = vec![
        result("site", ResultType::Website).with_company("Acme", true),
        result("pic", ResultType::Image).with_image("https://img.example/p.png"),
    ];
    let view = render(&results, Filter::All, false).unwrap();
    let items = view.gallery_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].src, "https://img.example/p.png");
    assert_eq!(items[1].src, FALLBACK_IMAGE);
    assert_eq!(items[1].attribution.as_deref(), Some("Acme"));
    assert_eq!(items[1].link.as_deref(), Some("https://site.example"));
}
