//! Deck snapshots printed by `bespoke run`.

use serde::Serialize;

use bespoke::{Deck, Element};

#[derive(Debug, Clone, Serialize)]
pub struct SlideSnapshot {
    pub index: usize,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeckSnapshot {
    pub deck: u64,
    pub container: String,
    pub active: usize,
    pub slides: Vec<SlideSnapshot>,
}

impl DeckSnapshot {
    pub fn capture(deck: &Deck) -> Self {
        let slides = deck
            .slides()
            .iter()
            .enumerate()
            .map(|(index, slide)| SlideSnapshot {
                index,
                tag: slide.tag().to_string(),
                id: slide.id().map(str::to_string),
                markers: slide.markers(),
            })
            .collect();
        Self {
            deck: deck.id(),
            container: describe(deck.parent()),
            active: deck.active_index(),
            slides,
        }
    }
}

fn describe(el: &Element) -> String {
    match el.id() {
        Some(id) => format!("{}#{id}", el.tag()),
        None => el.tag().to_string(),
    }
}

/// Human-readable table, one block per deck; the active slide is starred.
pub fn render_table(snapshots: &[DeckSnapshot]) -> String {
    let mut out = String::new();
    for snap in snapshots {
        out.push_str(&format!(
            "deck {} ({}): {} slides, active {}\n",
            snap.deck,
            snap.container,
            snap.slides.len(),
            snap.active
        ));
        for slide in &snap.slides {
            let star = if slide.index == snap.active { '*' } else { ' ' };
            let name = match &slide.id {
                Some(id) => format!("{}#{id}", slide.tag),
                None => slide.tag.clone(),
            };
            out.push_str(&format!(
                "  {star} {:>3}  {:<20} {}\n",
                slide.index,
                name,
                slide.markers.join(" ")
            ));
        }
    }
    out
}
