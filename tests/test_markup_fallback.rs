use recipe_scraper::{
    scrape, scrape_html, Instruction, ParsingContext, ScrapeError, ScraperConfig, Stage,
};

#[test]
fn test_headline_and_heading_list() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <body>
            <article>
                <span itemprop="headline">Stew</span>
                <h2>Ingredients</h2>
                <ul><li>Beef</li><li>Carrots</li></ul>
            </article>
        </body>
        </html>
    "#;
    let recipe = scrape_html("https://example.com/stew", html).unwrap();

    assert_eq!(recipe.name, "Stew");
    assert_eq!(recipe.ingredients(), ["Beef", "Carrots"]);
}

#[test]
fn test_microdata_and_meta_recipe() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <head>
            <meta property="og:image" content="https://cdn.example.com/bread.jpg">
            <meta name="keywords" content="bread, banana">
        </head>
        <body>
        <div itemscope itemtype="http://schema.org/Recipe">
            <h1 itemprop="name">Banana Bread</h1>
            <div itemprop="author" itemscope itemtype="http://schema.org/Person">
                <span itemprop="name">Cooking Divine</span>
            </div>
            <time itemprop="prepTime" datetime="PT10M">10 mins</time>
            <time itemprop="cookTime" datetime="1 hour">1 hour</time>
            <span itemprop="recipeYield">Serves 12</span>
            <ul>
                <li itemprop="recipeIngredient">3 bananas</li>
                <li itemprop="recipeIngredient">1 cup sugar</li>
            </ul>
            <ol itemprop="recipeInstructions">
                <li>Mash the bananas.</li>
                <li>Bake for an hour.</li>
            </ol>
        </div>
        </body>
        </html>
    "#;
    let recipe = scrape_html("https://example.com/bread", html).unwrap();

    assert_eq!(recipe.name, "Banana Bread");
    assert_eq!(recipe.image, "https://cdn.example.com/bread.jpg");
    assert_eq!(recipe.keywords, "bread, banana");
    assert_eq!(recipe.prep_time, "PT10M");
    assert_eq!(recipe.cook_time, "PT1H");
    assert_eq!(recipe.recipe_yield, 12);
    assert_eq!(recipe.ingredients(), ["3 bananas", "1 cup sugar"]);
    assert_eq!(
        recipe.instruction_texts(),
        vec!["Mash the bananas.", "Bake for an hour."]
    );
}

#[test]
fn test_heading_sections_become_instruction_sections() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <body>
            <h1>Layer Cake</h1>
            <h2>Ingredients</h2>
            <ul><li>flour</li><li>eggs</li></ul>
            <h2>Method</h2>
            <h3>Sponge</h3>
            <ol><li>Whisk eggs.</li><li>Fold in flour.</li></ol>
            <h3>Icing</h3>
            <ol><li>Beat butter.</li></ol>
            <h2>Comments</h2>
            <p>Lovely!</p>
        </body>
        </html>
    "#;
    let recipe = scrape_html("https://example.com/cake", html).unwrap();

    assert_eq!(recipe.name, "Layer Cake");
    assert_eq!(recipe.ingredients(), ["flour", "eggs"]);
    assert_eq!(
        recipe.instructions(),
        [
            Instruction::Section {
                name: "Sponge".to_string(),
                steps: vec!["Whisk eggs.".to_string(), "Fold in flour.".to_string()],
            },
            Instruction::Section {
                name: "Icing".to_string(),
                steps: vec!["Beat butter.".to_string()],
            },
        ]
    );
}

#[test]
fn test_malformed_json_ld_falls_back_to_markup() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <head>
            <meta property="og:title" content="Fallback Soup">
            <script type="application/ld+json">{"@type": "Recipe", "name": </script>
        </head>
        <body>
            <h2>Ingredients</h2>
            <ul><li>water</li><li>salt</li></ul>
        </body>
        </html>
    "#;
    let recipe = scrape_html("https://example.com/soup", html).unwrap();

    assert_eq!(recipe.name, "Fallback Soup");
    assert_eq!(recipe.ingredients(), ["water", "salt"]);
}

#[test]
fn test_malformed_json_ld_without_fallback() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <head>
            <script type="application/ld+json">{"@type": "Recipe", "name": </script>
        </head>
        <body><p>Nothing to see here.</p></body>
        </html>
    "#;
    let err = scrape_html("https://example.com/soup", html).unwrap_err();

    assert!(matches!(err, ScrapeError::StructuredDataMalformed { .. }));
    assert_eq!(err.stage(), Stage::JsonLd);
    assert!(err.record().is_some());
}

#[test]
fn test_heuristics_disabled() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <body>
            <span itemprop="headline">Stew</span>
            <h2>Ingredients</h2>
            <ul><li>Beef</li></ul>
        </body>
        </html>
    "#;
    let context = ParsingContext::from_html("https://example.com/stew", html).unwrap();
    let mut config = ScraperConfig::default();
    config.heuristics.enabled = false;

    let err = scrape(&context, &config).unwrap_err();
    assert!(matches!(err, ScrapeError::NoUsableData { .. }));

    let partial = err.into_record().unwrap();
    assert_eq!(partial.name, "Stew");
    assert!(partial.ingredients.is_none());
}

#[test]
fn test_unusable_structured_image_falls_back_to_meta() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <head>
            <meta property="og:image" content="https://cdn.example.com/soup.jpg">
            <script type="application/ld+json">
                {"@type": "Recipe", "name": "Soup", "image": "data:image/png;base64,AAA",
                 "thumbnailUrl": "javascript:void(0)", "recipeIngredient": ["water"]}
            </script>
        </head>
        <body>
            <div itemscope itemtype="https://schema.org/Recipe">
                <img itemprop="thumbnailUrl" src="/thumbs/soup.jpg">
            </div>
        </body>
        </html>
    "#;
    let recipe = scrape_html("https://example.com/soup", html).unwrap();

    assert_eq!(recipe.image, "https://cdn.example.com/soup.jpg");
    assert_eq!(recipe.thumbnail_url, "https://example.com/thumbs/soup.jpg");
}

#[test]
fn test_microdata_nutrition() {
    let _ = env_logger::try_init();

    let html = r#"
        <html>
        <body>
        <div itemscope itemtype="http://schema.org/Recipe">
            <h1 itemprop="name">Granola</h1>
            <span itemprop="cookingMethod">Baking</span>
            <ul><li itemprop="recipeIngredient">oats</li></ul>
            <div itemprop="nutrition" itemscope itemtype="http://schema.org/NutritionInformation">
                <span itemprop="calories"> 320  kcal </span>
                <span itemprop="fatContent">11 g</span>
            </div>
        </div>
        </body>
        </html>
    "#;
    let recipe = scrape_html("https://example.com/granola", html).unwrap();

    assert_eq!(recipe.cooking_method.value, "Baking");
    let nutrition = recipe.nutrition.unwrap();
    assert_eq!(nutrition.calories, "320 kcal");
    assert_eq!(nutrition.fat, "11 g");
    assert!(nutrition.sugar.is_empty());
}
