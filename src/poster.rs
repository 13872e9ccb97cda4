use crate::config::Configuration;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

/// What is known about a poster URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterStatus {
    Unchecked,
    Available,
    Failed,
}

/// Outcome of a background poster check, sent back to the event loop.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub url: String,
    pub status: PosterStatus,
}

/// Decides which image reference to show for a movie: its own poster, or
/// the placeholder when the poster is unusable or failed to load.
///
/// Checks run on spawned tasks. Their results only land in the cache when
/// the event loop calls [`PosterResolver::drain`].
pub struct PosterResolver {
    client: Option<reqwest::Client>,
    card_placeholder: String,
    detail_placeholder: String,
    cache: HashMap<String, PosterStatus>,
    pending: HashSet<String>,
    result_tx: UnboundedSender<ProbeResult>,
    result_rx: UnboundedReceiver<ProbeResult>,
}

impl PosterResolver {
    pub fn new(config: &Configuration, offline: bool) -> Self {
        let client = if offline || !config.probe_posters {
            None
        } else {
            match reqwest::Client::builder()
                .timeout(config.probe_timeout())
                .build()
            {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "poster probing disabled");
                    None
                }
            }
        };
        let (result_tx, result_rx) = unbounded_channel();
        Self {
            client,
            card_placeholder: config.placeholder_poster.clone(),
            detail_placeholder: config.detail_placeholder_poster.clone(),
            cache: HashMap::new(),
            pending: HashSet::new(),
            result_tx,
            result_rx,
        }
    }

    pub fn status(&self, poster: &str) -> PosterStatus {
        if !is_usable_url(poster) {
            return PosterStatus::Failed;
        }
        self.cache
            .get(poster)
            .copied()
            .unwrap_or(PosterStatus::Unchecked)
    }

    pub fn is_pending(&self, poster: &str) -> bool {
        self.pending.contains(poster)
    }

    /// URL to show on a card. Unchecked posters are shown as-is.
    pub fn display_url<'a>(&'a self, poster: &'a str) -> &'a str {
        self.resolve(poster, &self.card_placeholder)
    }

    /// URL to show in the detail overlay.
    pub fn detail_url<'a>(&'a self, poster: &'a str) -> &'a str {
        self.resolve(poster, &self.detail_placeholder)
    }

    fn resolve<'a>(&self, poster: &'a str, placeholder: &'a str) -> &'a str {
        match self.status(poster) {
            PosterStatus::Failed => placeholder,
            PosterStatus::Available | PosterStatus::Unchecked => poster,
        }
    }

    /// Start checking `poster` unless it is already known or in flight.
    /// Never waits on the network. Without a client a well-formed URL is
    /// trusted right away.
    pub fn request(&mut self, poster: &str) {
        if self.status(poster) != PosterStatus::Unchecked || self.pending.contains(poster) {
            return;
        }
        let Some(client) = self.client.clone() else {
            self.record(poster, PosterStatus::Available);
            return;
        };

        self.pending.insert(poster.to_string());
        let url = poster.to_string();
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let status = check(&client, &url).await;
            // The resolver may be gone on shutdown
            let _ = tx.send(ProbeResult { url, status });
        });
    }

    /// Fold finished checks into the cache. Returns how many arrived.
    pub fn drain(&mut self) -> usize {
        let mut received = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            self.pending.remove(&result.url);
            self.record(&result.url, result.status);
            received += 1;
        }
        received
    }

    fn record(&mut self, poster: &str, status: PosterStatus) {
        self.cache.insert(poster.to_string(), status);
    }
}

async fn check(client: &reqwest::Client, url: &str) -> PosterStatus {
    match client.head(url).send().await {
        Ok(response) if response.status().is_success() => PosterStatus::Available,
        Ok(response) => {
            debug!(url, status = %response.status(), "poster unavailable");
            PosterStatus::Failed
        }
        Err(e) => {
            debug!(url, error = %e, "poster request failed");
            PosterStatus::Failed
        }
    }
}

pub fn is_usable_url(url: &str) -> bool {
    let url = url.trim();
    (url.starts_with("https://") || url.starts_with("http://"))
        && !url.contains(char::is_whitespace)
        && url.len() > "https://".len()
}
