//! End-of-run monetization report
use crate::library::Library;
use serde::Serialize;
use std::cmp::Ordering;

/// One artist's line in the monetization report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRevenue {
    #[serde(skip)]
    pub artist: String,
    /// Streaming revenue, rounded to cents
    pub song_revenue: f64,
    pub merch_revenue: f64,
    pub ranking: usize,
    pub most_profitable_song: String,
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

impl Library {
    /// Rank every artist that was listened to by total revenue, highest first,
    /// ties broken by name
    ///
    /// Callers flush listener ledgers with [`split_money`](Self::split_money)
    /// first so that pending revenue is included.
    pub fn revenue_report(&self) -> Vec<ArtistRevenue> {
        let mut ranked: Vec<_> = self
            .artists()
            .iter()
            .filter(|artist| artist.plays > 0)
            .map(|artist| (artist, artist.song_revenue()))
            .collect();

        ranked.sort_by(|(a, a_songs), (b, b_songs)| {
            let a_total = a.merch_revenue + a_songs;
            let b_total = b.merch_revenue + b_songs;
            b_total
                .partial_cmp(&a_total)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.username.cmp(&b.username))
        });

        ranked
            .into_iter()
            .enumerate()
            .map(|(position, (artist, song_revenue))| ArtistRevenue {
                artist: artist.username.clone(),
                song_revenue: round_to_cents(song_revenue),
                merch_revenue: artist.merch_revenue,
                ranking: position + 1,
                most_profitable_song: artist
                    .most_profitable_song()
                    .unwrap_or("N/A")
                    .to_string(),
            })
            .collect()
    }
}
