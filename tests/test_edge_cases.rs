use std::time::Instant;

use recipe_scraper::config::load_config;
use recipe_scraper::{scrape, scrape_html, ParsingContext, ScrapeError, ScraperConfig, Stage};

#[test]
fn test_unparseable_input() {
    let _ = env_logger::try_init();

    for input in ["", "  \n\t ", "\u{0}\u{0}binary"] {
        let err = scrape_html("https://example.com/x", input).unwrap_err();
        assert!(matches!(err, ScrapeError::UnparseableDocument(_)), "{input:?}");
        assert_eq!(err.stage(), Stage::Markup);
        assert!(err.record().is_none());
    }
}

#[test]
fn test_page_without_recipe() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <head><title>About us</title></head>
        <body><p>We are a small family blog.</p></body>
        </html>
    "#;
    let err = scrape_html("https://example.com/about", html).unwrap_err();

    assert!(matches!(err, ScrapeError::NoUsableData { .. }));
    assert_eq!(err.stage(), Stage::Validation);

    let partial = err.into_record().unwrap();
    assert!(partial.name.is_empty());
    assert_eq!(partial.url, "https://example.com/about");
}

#[test]
fn test_name_without_lists_is_not_usable() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <head><meta property="og:title" content="Just a Title"></head>
        <body><p>Nothing else.</p></body>
        </html>
    "#;
    let err = scrape_html("https://example.com/title", html).unwrap_err();

    assert_eq!(err.record().map(|r| r.name.as_str()), Some("Just a Title"));
}

#[test]
fn test_heuristic_scan_past_deadline() {
    let _ = env_logger::try_init();

    let html = r#"
        <html><body>
            <h1>Rice</h1>
            <h2>Ingredients</h2>
            <ul><li>rice</li></ul>
        </body></html>
    "#;
    let context = ParsingContext::from_html("https://example.com/rice", html)
        .unwrap()
        .with_deadline(Instant::now());

    let err = scrape(&context, &ScraperConfig::default()).unwrap_err();
    assert!(matches!(err, ScrapeError::Timeout));
    assert_eq!(err.stage(), Stage::Heuristic);
}

#[test]
fn test_structured_data_skips_heuristic_deadline() {
    let _ = env_logger::try_init();

    let html = r#"
        <html><head><script type="application/ld+json">
            {"@type": "Recipe", "name": "Rice", "recipeIngredient": ["rice"],
             "recipeInstructions": ["Boil."]}
        </script></head><body></body></html>
    "#;
    let context = ParsingContext::from_html("https://example.com/rice", html)
        .unwrap()
        .with_deadline(Instant::now());

    let recipe = scrape(&context, &ScraperConfig::default()).unwrap();
    assert_eq!(recipe.instruction_texts(), vec!["Boil."]);
}

#[test]
fn test_default_config() {
    let config = load_config().unwrap();

    assert!(config.heuristics.enabled);
    assert_eq!(config.heuristics.max_entries, 250);
    assert!(config.heuristics.deadline().is_none());
    assert!(config.overrides.allows("examplesite"));
}
