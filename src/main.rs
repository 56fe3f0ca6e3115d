use std::env;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use recipe_browse::{AppConfig, BrowseError, Favorites, FileStore, Listing, RecipeApi};

const USAGE: &str = "Usage: recipe-browse <command>

Commands:
  list [cuisine]        Page through recipes, optionally scoped to a cuisine tag
  search <text>         Full-text search
  show <id>             Show one recipe in full
  tags                  List available tags
  fav list              List favorited recipe ids
  fav add <id>          Mark a recipe as favorite
  fav rm <id>           Unmark a recipe";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        debug!("No usable config, falling back to defaults: {}", e);
        AppConfig::default()
    });
    let api = RecipeApi::with_base_url(&config.base_url, Some(Duration::from_secs(config.timeout)))?;

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["list"] => print_all_pages(&api, &config, None).await?,
        ["list", cuisine] => print_all_pages(&api, &config, Some(cuisine)).await?,
        ["search", text] => {
            let mut listing = Listing::new(config.page_size);
            if let Some(request) = listing.set_search(*text) {
                let result = request.fetch(&api).await;
                listing.complete(&request, result);
            }
            while listing.load_more(&api).await {}
            print_listing(&listing)?;
        }
        ["show", id] => {
            let id: u64 = id.parse().map_err(|_| "Recipe id must be a number")?;
            match api.get(id).await {
                Ok(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
                Err(BrowseError::InvalidIdentifier(id)) => {
                    eprintln!("No recipe with id {}", id);
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        ["tags"] => {
            for tag in api.tags().await? {
                println!("{}", tag);
            }
        }
        ["fav", rest @ ..] => {
            let favorites = Favorites::new(Arc::new(FileStore::new(&config.storage_path)));
            favorites.initialize().await;
            match rest {
                ["list"] => {
                    for id in favorites.ids() {
                        println!("{}", id);
                    }
                }
                ["add", id] => {
                    let id: u64 = id.parse().map_err(|_| "Recipe id must be a number")?;
                    // Reject ids the service does not know about.
                    api.get(id).await?;
                    favorites.add(id).await;
                }
                ["rm", id] => {
                    let id: u64 = id.parse().map_err(|_| "Recipe id must be a number")?;
                    favorites.remove(id).await;
                }
                _ => {
                    eprintln!("{}", USAGE);
                    std::process::exit(2);
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}

async fn print_all_pages(
    api: &RecipeApi,
    config: &AppConfig,
    cuisine: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut listing = Listing::new(config.page_size);
    match cuisine {
        Some(cuisine) => {
            if let Some(request) = listing.set_cuisine(Some(cuisine.to_string())) {
                let result = request.fetch(api).await;
                listing.complete(&request, result);
            }
        }
        None => listing.load_initial(api).await,
    }
    while listing.load_more(api).await {}
    print_listing(&listing)
}

fn print_listing(listing: &Listing) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(e) = listing.error() {
        eprintln!("Fetch failed: {}", e);
        std::process::exit(1);
    }
    for recipe in listing.items() {
        println!("{:>5}  {}", recipe.id, recipe.name);
    }
    debug!(
        "{} of {} recipes listed",
        listing.items().len(),
        listing.total()
    );
    Ok(())
}
