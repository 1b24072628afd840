use std::thread;

use recipe_scraper::overrides::registry;
use recipe_scraper::scrape_html;

fn create_recipe_html(name: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <script type="application/ld+json">
                {{"@type": "Recipe", "name": "{name} | Example Site", "recipeIngredient": ["water"]}}
            </script>
        </head>
        <body></body>
        </html>
        "#
    )
}

#[test]
fn test_parallel_scrapes_share_registry() {
    let _ = env_logger::try_init();

    let names: Vec<String> = (0..8).map(|i| format!("Soup {i}")).collect();

    let results: Vec<(String, String)> = thread::scope(|scope| {
        let handles: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                scope.spawn(move || {
                    // alternate between a registered and an unregistered site
                    let url = if i % 2 == 0 {
                        format!("https://www.examplesite.com/soup-{i}")
                    } else {
                        format!("https://www.othersite.com/soup-{i}")
                    };
                    let recipe = scrape_html(&url, &create_recipe_html(name)).unwrap();
                    (url, recipe.name)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, (url, name)) in results.iter().enumerate() {
        if i % 2 == 0 {
            assert_eq!(name, &format!("Soup {i}"), "{url}");
        } else {
            assert_eq!(name, &format!("Soup {i} | Example Site"), "{url}");
        }
    }
    assert!(registry().contains("examplesite"));
}
