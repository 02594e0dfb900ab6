use std::time::Duration;

use log::info;
use ngram_lm_core::corpus::{CorpusError, CorpusProvider, clean_text, fit_to_length};
use reqwest::blocking::Client;

/// Page scraped by default.
pub const DEFAULT_URL: &str = "https://info.uaic.ro/intrebari-frecvente-studenti";

/// Corpus fetched from a web page.
///
/// The page body is cleaned with `clean_text`, then repeated and truncated
/// to exactly `min_words` tokens.
pub struct WebCorpus {
    client: Client,
    url: String,
    min_words: usize,
}

impl WebCorpus {
    /// Creates a web corpus with a reusable blocking client and a timeout.
    pub fn new(url: &str, min_words: usize) -> Result<Self, CorpusError> {
        let client = Client::builder()
            .timeout(Duration::new(10, 0))
            .build()
            .map_err(|e| CorpusError::Fetch { url: url.to_owned(), source: Box::new(e) })?;
        Ok(Self { client, url: url.to_owned(), min_words })
    }

    fn fetch(&self) -> reqwest::Result<String> {
        self.client
            .get(&self.url)
            .send()?
            .error_for_status()?
            .text()
    }
}

impl CorpusProvider for WebCorpus {
    fn tokens(&self) -> Result<Vec<String>, CorpusError> {
        let body = self
            .fetch()
            .map_err(|e| CorpusError::Fetch { url: self.url.clone(), source: Box::new(e) })?;
        info!("fetched {} bytes from {}", body.len(), self.url);
        fit_to_length(clean_text(&body), self.min_words)
    }
}
