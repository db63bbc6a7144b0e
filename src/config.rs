use std::path::PathBuf;

use clap::Parser;

/// Categories merged when neither `--category` nor `PRODUCT_CATEGORIES` is given.
pub const DEFAULT_CATEGORIES: [&str; 4] =
    ["dtdd", "laptop", "may-tinh-bang", "dong-ho-thong-minh"];

pub const DEFAULT_BASE_ROOT: &str = "public/product_data/data";

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Merge per-product JSON files into one products.json per brand directory
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Directory holding one subdirectory per category
    #[arg(env = "PRODUCT_DATA_ROOT", default_value = DEFAULT_BASE_ROOT)]
    pub base_root: PathBuf,

    /// Category to merge, repeatable or comma-delimited
    #[arg(
        short,
        long = "category",
        env = "PRODUCT_CATEGORIES",
        value_delimiter = ',',
        default_values_t = default_categories()
    )]
    categories: Vec<String>,
}

impl Config {
    /// Loads `.env` if one exists, then parses the command line.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn new(base_root: impl Into<PathBuf>, categories: &[&str]) -> Self {
        Self {
            base_root: base_root.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Configured category names in order, with blank entries dropped.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_category_list() {
        assert_eq!(
            default_categories(),
            vec!["dtdd", "laptop", "may-tinh-bang", "dong-ho-thong-minh"]
        );
    }

    #[test]
    fn parses_repeated_and_delimited_categories() {
        let config = Config::try_parse_from([
            "product-merger",
            "/data",
            "-c",
            "laptop,dtdd",
            "--category",
            "tablet",
        ])
        .unwrap();

        assert_eq!(config.base_root, PathBuf::from("/data"));
        assert_eq!(
            config.categories().collect::<Vec<_>>(),
            vec!["laptop", "dtdd", "tablet"]
        );
    }

    #[test]
    fn reads_base_root_and_categories_from_env() {
        // The only test that parses without explicit arguments, so nothing else reads these.
        std::env::set_var("PRODUCT_DATA_ROOT", "/srv/product_data");
        std::env::set_var("PRODUCT_CATEGORIES", "laptop, ,dtdd");

        let config = Config::try_parse_from(["product-merger"]);

        std::env::remove_var("PRODUCT_DATA_ROOT");
        std::env::remove_var("PRODUCT_CATEGORIES");
        let config = config.unwrap();
        assert_eq!(config.base_root, PathBuf::from("/srv/product_data"));
        assert_eq!(config.categories().collect::<Vec<_>>(), vec!["laptop", "dtdd"]);
    }

    #[test]
    fn blank_categories_are_dropped() {
        let config = Config::new("/data", &["laptop", " ", "", " dtdd "]);
        assert_eq!(config.categories().collect::<Vec<_>>(), vec!["laptop", "dtdd"]);
    }

    #[test]
    fn duplicate_categories_are_kept_in_order() {
        let config =
            Config::try_parse_from(["product-merger", "/data", "-c", "laptop,dtdd,laptop"]).unwrap();
        assert_eq!(
            config.categories().collect::<Vec<_>>(),
            vec!["laptop", "dtdd", "laptop"]
        );
    }
}
