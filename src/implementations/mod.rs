pub mod http_fetcher;
pub mod issue_markup;
pub mod issue_scraper;
pub mod theme_verifier;
pub mod github_client;
pub mod annotator;
pub mod site_checker;
pub mod report_writer;
